//! Terminal UI display of a figure using ratatui.

use crate::figure::{AxisRange, Figure, Panel, X_LABEL};
use crate::table::SensorKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

fn series_color(kind: SensorKind) -> Color {
    match kind {
        SensorKind::Gyroscope => Color::Cyan,
        SensorKind::Accelerometer => Color::Yellow,
    }
}

/// Format an axis tick value compactly
fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn tick_labels(range: AxisRange) -> Vec<String> {
    let mid = range.min + range.span() / 2.0;
    vec![format_tick(range.min), format_tick(mid), format_tick(range.max)]
}

/// Render the whole figure: stacked panels plus the help bar
pub fn render_figure(f: &mut Frame, figure: &Figure) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(1)])
        .split(f.area());

    let count = figure.panels.len().max(1) as u32;
    let constraints: Vec<Constraint> = figure
        .panels
        .iter()
        .map(|_| Constraint::Ratio(1, count))
        .collect();
    let panel_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(main_chunks[0]);

    for (panel, area) in figure.panels.iter().zip(panel_chunks.iter()) {
        render_panel(f, *area, panel, figure.x_range);
    }

    render_help_bar(f, main_chunks[1]);
}

/// Render one attribute as a line chart
pub fn render_panel(f: &mut Frame, area: Rect, panel: &Panel, x_range: AxisRange) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    if let Some(title) = &panel.title {
        block = block.title(format!(" {} ", title)).title_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    }

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(series_color(panel.attribute.kind())))
        .data(&panel.points);

    // Hidden x axes keep their bounds but get no labels, so no ticks are drawn
    let mut x_axis = Axis::default().bounds([x_range.min, x_range.max]);
    if panel.show_x_axis {
        x_axis = x_axis
            .title(X_LABEL)
            .style(Style::default().fg(Color::Gray))
            .labels(tick_labels(x_range));
    }

    let y_axis = Axis::default()
        .title(panel.attribute.column())
        .style(Style::default().fg(Color::Gray))
        .bounds([panel.y_range.min, panel.y_range.max])
        .labels(tick_labels(panel.y_range));

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis);

    f.render_widget(chart, area);
}

/// Render help bar at the bottom
pub fn render_help_bar(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(" q / Esc / Enter: close figure ")
        .style(Style::default().fg(Color::Black).bg(Color::Gray));
    f.render_widget(paragraph, area);
}
