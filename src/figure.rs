//! Figure model: the six stacked panels of one episode, independent of any backend.

use crate::table::{Attribute, CleanedTable};

pub const X_LABEL: &str = "time";

/// Fraction of the data span added above and below each panel's y values
const Y_MARGIN: f64 = 0.05;

/// Closed interval used for an axis, always with `min < max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Range covering `lo..=hi` plus `margin` of the span on each side.
    /// A zero-width span is widened by one unit so backends never see an empty range.
    pub fn covering(lo: f64, hi: f64, margin: f64) -> Self {
        let span = hi - lo;
        if span > 0.0 {
            Self {
                min: lo - span * margin,
                max: hi + span * margin,
            }
        } else {
            Self {
                min: lo - 0.5,
                max: hi + 0.5,
            }
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

/// One line plot of a single attribute against synthetic time
#[derive(Debug, Clone)]
pub struct Panel {
    pub attribute: Attribute,
    pub points: Vec<(f64, f64)>,
    pub y_range: AxisRange,
    /// Whether x tick marks, tick labels and the x label are drawn
    pub show_x_axis: bool,
    pub title: Option<String>,
}

/// Stacked panels sharing one time axis
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub x_range: AxisRange,
    pub panels: Vec<Panel>,
}

/// Lay out the six attribute panels for a cleaned episode.
///
/// Panels follow `Attribute::ALL` top to bottom; only the bottom panel keeps its
/// x axis and only the top panel carries the title.
pub fn build_figure(title: &str, table: &CleanedTable) -> Figure {
    let x_range = match (table.time().first(), table.time().last()) {
        (Some(&first), Some(&last)) => AxisRange::covering(first, last, 0.0),
        _ => AxisRange::default(),
    };

    let last = Attribute::ALL.len() - 1;
    let panels = Attribute::ALL
        .iter()
        .enumerate()
        .map(|(i, &attribute)| Panel {
            attribute,
            points: table.points(attribute),
            y_range: table
                .value_range(attribute)
                .map(|(lo, hi)| AxisRange::covering(lo, hi, Y_MARGIN))
                .unwrap_or_default(),
            show_x_axis: i == last,
            title: (i == 0).then(|| title.to_string()),
        })
        .collect();

    Figure {
        title: title.to_string(),
        x_range,
        panels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{RawTable, DEFAULT_SAMPLE_RATE_HZ};

    fn table(body: &str) -> CleanedTable {
        let csv = format!("time,g_x,g_y,g_z,a_x,a_y,a_z\n{body}");
        let raw = RawTable::from_reader("fig.csv", csv.as_bytes()).unwrap();
        CleanedTable::from_raw(&raw, DEFAULT_SAMPLE_RATE_HZ).unwrap()
    }

    #[test]
    fn panels_follow_attribute_order() {
        let fig = build_figure("play", &table("0,1,2,3,4,5,6\n1,7,8,9,10,11,12\n"));
        let order: Vec<&str> = fig.panels.iter().map(|p| p.attribute.column()).collect();
        assert_eq!(order, ["g_x", "g_y", "g_z", "a_x", "a_y", "a_z"]);
    }

    #[test]
    fn only_bottom_panel_shows_x_axis() {
        let fig = build_figure("sleep", &table("0,1,2,3,4,5,6\n"));
        let shown: Vec<bool> = fig.panels.iter().map(|p| p.show_x_axis).collect();
        assert_eq!(shown, [false, false, false, false, false, true]);
    }

    #[test]
    fn only_top_panel_has_title() {
        let fig = build_figure("seizure", &table("0,1,2,3,4,5,6\n"));
        assert_eq!(fig.panels[0].title.as_deref(), Some("seizure"));
        assert!(fig.panels[1..].iter().all(|p| p.title.is_none()));
        assert_eq!(fig.title, "seizure");
    }

    #[test]
    fn panels_plot_synthetic_time_against_attribute() {
        let fig = build_figure("play", &table("0,1,2,3,4,5,6\n0.2,7,8,9,10,11,12\n"));
        let az = &fig.panels[5];
        assert_eq!(az.attribute, Attribute::AccelZ);
        assert_eq!(az.points, vec![(0.0625, 6.0), (0.125, 12.0)]);
        assert_eq!(fig.x_range, AxisRange { min: 0.0625, max: 0.125 });
    }

    #[test]
    fn single_row_gets_non_degenerate_ranges() {
        let fig = build_figure("play", &table("0,1,2,3,4,5,6\n"));
        assert!(fig.x_range.span() > 0.0);
        assert!(fig.panels.iter().all(|p| p.y_range.span() > 0.0));
        assert_eq!(fig.panels[0].y_range, AxisRange { min: 0.5, max: 1.5 });
    }

    #[test]
    fn y_range_has_margin() {
        let fig = build_figure("play", &table("0,0,0,0,0,0,0\n1,10,0,0,0,0,0\n"));
        assert_eq!(fig.panels[0].y_range, AxisRange { min: -0.5, max: 10.5 });
    }
}
