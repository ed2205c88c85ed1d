//! Analytics tab rendering.
//!
//! Summary cards, two line charts and a per-month table built from
//! [`MonthlyMetrics`](crate::metrics::MonthlyMetrics).

use crate::app::App;
use crate::metrics::format_metric;
use crate::theme::Palette;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table, Widget},
};

/// Contiguous runs of non-null values as chart points.
///
/// A `None` ends the current run, so the line shows a gap for that month
/// instead of dropping to zero.
pub fn line_segments(series: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for (idx, value) in series.iter().enumerate() {
        match value {
            Some(v) => current.push((idx as f64, *v)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// All non-null values as chart points.
pub fn points(series: &[Option<f64>]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| value.map(|v| (idx as f64, v)))
        .collect()
}

/// Upper y bound leaving some headroom above the largest value.
fn y_upper_bound(series: &[&[Option<f64>]]) -> f64 {
    let max = series
        .iter()
        .flat_map(|s| s.iter().flatten())
        .fold(0.0_f64, |acc, v| acc.max(*v));
    (max * 1.2).max(1.0)
}

/// Render the analytics tab.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
pub fn render_analytics(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = app.theme.palette();
    let metrics = &app.metrics;

    if metrics.is_empty() {
        let message = if app.is_loading() {
            "Loading...".to_string()
        } else {
            format!(
                "No pull request or issue activity in the last {} months",
                app.window_months
            )
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(palette.muted),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().title("Analytics").borders(Borders::ALL));
        Widget::render(paragraph, area, buf);
        return;
    }

    let table_height = u16::try_from(metrics.labels.len())
        .unwrap_or(u16::MAX)
        .saturating_add(3);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Summary cards
            Constraint::Min(8),               // Charts
            Constraint::Length(table_height), // Monthly table
        ])
        .split(area);

    render_summary_cards(app, &palette, chunks[0], buf);

    let chart_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_time_chart(app, &palette, chart_chunks[0], buf);
    render_efficiency_chart(app, &palette, chart_chunks[1], buf);

    render_month_table(app, &palette, chunks[2], buf);
}

fn render_summary_cards(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let summary = app.metrics.summary();
    let cards = [
        (
            "Avg PR merge time",
            format_metric(summary.avg_merge_time, " days"),
            palette.series[0],
        ),
        (
            "Avg issue resolution",
            format_metric(summary.avg_resolution_time, " days"),
            palette.series[1],
        ),
        (
            "Avg review efficiency",
            format_metric(summary.avg_review_efficiency, "%"),
            palette.series[2],
        ),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (chunk, (title, value, color)) in chunks.iter().zip(cards) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));
        Widget::render(paragraph, *chunk, buf);
    }
}

/// Named scatter dataset plus unnamed line segments for one series.
fn series_datasets<'a>(
    name: &'a str,
    all_points: &'a [(f64, f64)],
    segments: &'a [Vec<(f64, f64)>],
    style: Style,
) -> Vec<Dataset<'a>> {
    let mut datasets = vec![
        Dataset::default()
            .name(name)
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(style)
            .data(all_points),
    ];
    datasets.extend(segments.iter().map(|segment| {
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(style)
            .data(segment)
    }));
    datasets
}

fn x_axis<'a>(app: &App, palette: &Palette) -> Axis<'a> {
    let upper = (app.metrics.labels.len().max(2) - 1) as f64;
    Axis::default()
        .style(Style::default().fg(palette.muted))
        .bounds([0.0, upper])
        .labels(app.metrics.labels.clone())
}

fn render_time_chart(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let metrics = &app.metrics;
    let merge_points = points(&metrics.pr_merge_time);
    let merge_segments = line_segments(&metrics.pr_merge_time);
    let resolution_points = points(&metrics.issue_resolution_time);
    let resolution_segments = line_segments(&metrics.issue_resolution_time);

    let mut datasets = series_datasets(
        "PR merge time",
        &merge_points,
        &merge_segments,
        Style::default().fg(palette.series[0]),
    );
    datasets.extend(series_datasets(
        "Issue resolution",
        &resolution_points,
        &resolution_segments,
        Style::default().fg(palette.series[1]),
    ));

    let upper = y_upper_bound(&[
        metrics.pr_merge_time.as_slice(),
        metrics.issue_resolution_time.as_slice(),
    ]);
    let chart = Chart::new(datasets)
        .block(Block::default().title("Time to close (days)").borders(Borders::ALL))
        .x_axis(x_axis(app, palette))
        .y_axis(
            Axis::default()
                .style(Style::default().fg(palette.muted))
                .bounds([0.0, upper])
                .labels(vec![
                    "0".to_string(),
                    format!("{:.1}", upper / 2.0),
                    format!("{:.1}", upper),
                ]),
        );

    Widget::render(chart, area, buf);
}

fn render_efficiency_chart(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let metrics = &app.metrics;
    let efficiency_points = points(&metrics.review_efficiency);
    let efficiency_segments = line_segments(&metrics.review_efficiency);

    let datasets = series_datasets(
        "Review efficiency",
        &efficiency_points,
        &efficiency_segments,
        Style::default().fg(palette.series[2]),
    );

    let chart = Chart::new(datasets)
        .block(Block::default().title("Review efficiency (%)").borders(Borders::ALL))
        .x_axis(x_axis(app, palette))
        .y_axis(
            Axis::default()
                .style(Style::default().fg(palette.muted))
                .bounds([0.0, 100.0])
                .labels(vec!["0", "50", "100"]),
        );

    Widget::render(chart, area, buf);
}

fn render_month_table(app: &App, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let metrics = &app.metrics;
    let rows: Vec<Row> = metrics
        .labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let counts = metrics.counts.get(idx).copied().unwrap_or_default();
            let value = |series: &[Option<f64>], suffix: &str| {
                format_metric(series.get(idx).copied().flatten(), suffix)
            };
            Row::new(vec![
                label.clone(),
                counts.pull_requests.to_string(),
                counts.merged.to_string(),
                value(metrics.pr_merge_time.as_slice(), "d"),
                value(metrics.review_efficiency.as_slice(), "%"),
                counts.issues.to_string(),
                counts.closed_issues.to_string(),
                value(metrics.issue_resolution_time.as_slice(), "d"),
            ])
        })
        .collect();

    let header = Row::new(vec![
        "Month",
        "PRs",
        "Merged",
        "Merge time",
        "Efficiency",
        "Issues",
        "Closed",
        "Resolution",
    ])
    .style(
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, [Constraint::Ratio(1, 8); 8])
        .header(header)
        .style(Style::default().fg(palette.text))
        .block(Block::default().title("By month").borders(Borders::ALL));

    Widget::render(table, area, buf);
}
