//! Search widget rendering.
//!
//! Displays the search input bar of the active tab.

use crate::app::{App, UiMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the search widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Displays the active tab's query and highlights when in search mode.
/// The analytics tab has no search.
pub fn render_search(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = app.theme.palette();
    let is_active = app.mode == UiMode::Search;

    let line = match app.active_view_state() {
        Some(state) => {
            let prompt = if is_active {
                "Search: "
            } else {
                "Search (press '/'): "
            };
            Line::from(vec![
                Span::styled(prompt, Style::default().fg(palette.active)),
                Span::styled(
                    state.search_query.as_str(),
                    Style::default().fg(if is_active { palette.text } else { palette.muted }),
                ),
                Span::styled(
                    if is_active { "_" } else { "" },
                    Style::default().fg(palette.active),
                ),
            ])
        }
        None => Line::from(Span::styled(
            "Search is not available on this tab",
            Style::default().fg(palette.dim),
        )),
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(format!("Search {}", app.active_tab.title()))
            .borders(Borders::ALL)
            .style(if is_active {
                Style::default().fg(palette.active)
            } else {
                Style::default()
            }),
    );

    Widget::render(paragraph, area, buf);
}
