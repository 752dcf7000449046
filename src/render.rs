//! Figure drawing with plotters.

use crate::error::{Result, VizError};
use crate::figure::{AxisRange, Figure, Panel, X_LABEL};
use crate::table::SensorKind;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;

/// Default exported figure size in pixels
pub const DEFAULT_SIZE: (u32, u32) = (1200, 1400);

fn render_err<E: Display>(e: E) -> VizError {
    VizError::Render(e.to_string())
}

fn series_color(kind: SensorKind) -> RGBColor {
    match kind {
        SensorKind::Gyroscope => BLUE,
        SensorKind::Accelerometer => RED,
    }
}

/// Draw all panels of a figure stacked top to bottom on `root`
pub fn draw_figure<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let areas = root.split_evenly((figure.panels.len().max(1), 1));
    for (area, panel) in areas.iter().zip(&figure.panels) {
        draw_panel(area, panel, figure.x_range)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    x_range: AxisRange,
) -> Result<()> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(5)
        .y_label_area_size(60)
        // No bottom label area means no x ticks, tick labels or label
        .x_label_area_size(if panel.show_x_axis { 40 } else { 0 });
    if let Some(title) = &panel.title {
        builder.caption(title, ("sans-serif", 28));
    }

    let y_range = panel.y_range;
    let mut chart = builder
        .build_cartesian_2d(x_range.min..x_range.max, y_range.min..y_range.max)
        .map_err(render_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(panel.attribute.column()).y_labels(5);
    if panel.show_x_axis {
        mesh.x_desc(X_LABEL).x_labels(10);
    }
    mesh.draw().map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            panel.points.iter().copied(),
            &series_color(panel.attribute.kind()),
        ))
        .map_err(render_err)?;

    Ok(())
}

/// Render a figure into an in-memory SVG document
pub fn render_svg(figure: &Figure, size: (u32, u32)) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_figure(&root, figure)?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::build_figure;
    use crate::table::{Attribute, CleanedTable, RawTable, DEFAULT_SAMPLE_RATE_HZ};

    fn figure(title: &str, body: &str) -> Figure {
        let csv = format!("time,g_x,g_y,g_z,a_x,a_y,a_z\n{body}");
        let raw = RawTable::from_reader("render.csv", csv.as_bytes()).unwrap();
        let table = CleanedTable::from_raw(&raw, DEFAULT_SAMPLE_RATE_HZ).unwrap();
        build_figure(title, &table)
    }

    /// Text elements whose whole content is `text`, however the backend breaks lines
    fn text_count(svg: &str, text: &str) -> usize {
        svg.replace('\n', "").matches(&format!(">{text}<")).count()
    }

    #[test]
    fn svg_contains_title_and_every_attribute_in_order() {
        let fig = figure("seizure", "0,1,2,3,4,5,6\n1,2,3,4,5,6,7\n2,0,1,0,1,0,1\n");
        let svg = render_svg(&fig, DEFAULT_SIZE).unwrap();

        assert_eq!(text_count(&svg, "seizure"), 1);
        let svg = svg.replace('\n', "");
        let positions: Vec<usize> = Attribute::ALL
            .iter()
            .map(|a| svg.find(&format!(">{}<", a.column())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn svg_labels_time_axis_once() {
        let fig = figure("play", "0,1,2,3,4,5,6\n1,2,3,4,5,6,7\n");
        let svg = render_svg(&fig, DEFAULT_SIZE).unwrap();
        assert_eq!(text_count(&svg, X_LABEL), 1);
    }

    /// Numeric, horizontally centred, unrotated text: plotters' x tick labels.
    /// Returns the y coordinate of each one.
    fn x_tick_label_rows(svg: &str) -> Vec<i32> {
        svg.split("<text ")
            .skip(1)
            .filter_map(|chunk| {
                let (attrs, rest) = chunk.split_once('>')?;
                let content = rest.split("</text>").next()?.trim();
                if !attrs.contains("text-anchor=\"middle\"")
                    || attrs.contains("transform=")
                    || content.parse::<f64>().is_err()
                {
                    return None;
                }
                attrs.split(" y=\"").nth(1)?.split('"').next()?.parse().ok()
            })
            .collect()
    }

    #[test]
    fn svg_x_tick_labels_only_in_bottom_panel() {
        let fig = figure("play", "0,1,2,3,4,5,6\n1,2,3,4,5,6,7\n2,0,1,0,1,0,1\n3,5,5,5,5,5,5\n");
        let (width, height) = DEFAULT_SIZE;
        let svg = render_svg(&fig, (width, height)).unwrap();

        let rows = x_tick_label_rows(&svg);
        assert!(!rows.is_empty(), "no x tick labels drawn");
        let bottom_panel_top = height as i32 * 5 / 6;
        assert!(rows.iter().all(|&y| y > bottom_panel_top), "rows: {rows:?}");
    }

    #[test]
    fn single_row_figure_renders() {
        let fig = figure("sleep", "0,1,2,3,4,5,6\n");
        let svg = render_svg(&fig, (600, 700)).unwrap();
        assert!(svg.contains("<svg"));
    }
}
