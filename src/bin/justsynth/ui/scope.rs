//! Output oscilloscope

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Smallest vertical range, so quiet signals are not blown up into noise.
const MIN_RANGE: f32 = 0.25;

pub fn render_scope(frame: &mut Frame, area: Rect, samples: &[f32]) {
    let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let range = peak.clamp(MIN_RANGE, 1.0) as f64;

    let step = 1.0 / samples.len().max(1) as f64;
    let points: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64 * step, s as f64))
        .collect();

    let trace = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(if peak >= 1.0 { Color::Red } else { Color::Cyan }))
        .data(&points);

    let axis_style = Style::default().fg(Color::DarkGray);
    let chart = Chart::new(vec![trace])
        .block(
            Block::default()
                .title(format!(" Output (peak {peak:.2}) "))
                .borders(Borders::ALL),
        )
        .x_axis(Axis::default().bounds([0.0, 1.0]).style(axis_style))
        .y_axis(Axis::default().bounds([-range, range]).style(axis_style));

    frame.render_widget(chart, area);
}
