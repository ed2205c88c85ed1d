//! Tabs widget rendering.
//!
//! Displays tab headers for switching between activity views.

use crate::app::{App, Tab};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the tabs widget.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Displays every tab with its number key and, for list tabs, the item count.
/// Highlights the active tab.
pub fn render_tabs(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = app.theme.palette();
    let mut spans = Vec::new();

    for (i, tab) in Tab::ALL.iter().enumerate() {
        let is_active = *tab == app.active_tab;
        let style = if is_active {
            Style::default()
                .fg(palette.selection_fg)
                .bg(palette.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };

        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(palette.dim)));
        }

        let label = match tab {
            Tab::Analytics => format!("{} {}", i + 1, tab.title()),
            _ => format!("{} {} ({})", i + 1, tab.title(), app.source_len(*tab)),
        };
        let tab_text = if is_active {
            format!("▶ {} ◀", label)
        } else {
            format!("  {}  ", label)
        };
        spans.push(Span::styled(tab_text, style));
    }

    let title = if app.snapshot.login.is_empty() {
        "GitHub Activity".to_string()
    } else {
        format!("GitHub Activity: {}", app.snapshot.login)
    };

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title(title).borders(Borders::ALL))
        .alignment(Alignment::Center);

    Widget::render(paragraph, area, buf);
}
