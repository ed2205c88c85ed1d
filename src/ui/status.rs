//! View info widget rendering.
//!
//! Displays the sort option, row counts and theme of the active tab.

use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the view info widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// One line with:
/// - Sort option (list tabs) or metrics window (analytics)
/// - Shown/total row counts
/// - Theme
/// - Loading indicator while a refresh runs
pub fn render_view_info(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = app.theme.palette();
    let label = Style::default().fg(palette.accent);
    let value = Style::default().fg(palette.text);
    let separator = Span::styled("  |  ", Style::default().fg(palette.dim));

    let mut spans = match app.sort_name() {
        Some(sort) => vec![
            Span::styled("Sort: ", label),
            Span::styled(sort, Style::default().fg(palette.merged)),
            separator.clone(),
            Span::styled("Showing: ", label),
            Span::styled(
                format!(
                    "{}/{}",
                    app.visible_len(app.active_tab),
                    app.source_len(app.active_tab)
                ),
                value,
            ),
        ],
        None => vec![
            Span::styled("Window: ", label),
            Span::styled(format!("last {} months", app.window_months), value),
        ],
    };

    spans.push(separator.clone());
    spans.push(Span::styled("Theme: ", label));
    spans.push(Span::styled(app.theme.as_str(), value));

    if app.is_loading() {
        spans.push(separator);
        spans.push(Span::styled("Loading...", Style::default().fg(palette.active)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title("View (press 's')").borders(Borders::ALL));

    Widget::render(paragraph, area, buf);
}
