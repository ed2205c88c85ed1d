//! UI components module.
//!
//! Contains ratatui widgets for displaying the dashboard.

pub mod charts;
pub mod list;
pub mod search;
pub mod status;
pub mod tabs;

pub use charts::render_analytics;
pub use list::render_list;
pub use search::render_search;
pub use status::render_view_info;
pub use tabs::render_tabs;

use crate::app::{App, Tab};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

const KEY_HINTS: &str =
    "q quit | Tab/1-6 switch | j/k move | / search | s sort | t theme | r refresh | Enter open";

/// Screen regions, top to bottom.
pub struct ScreenLayout {
    pub tabs: Rect,
    pub search: Rect,
    pub info: Rect,
    pub content: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Length(3), // Search bar
                Constraint::Length(3), // View info
                Constraint::Min(0),    // Table or charts
                Constraint::Length(3), // Status bar
            ])
            .split(area);
        Self {
            tabs: chunks[0],
            search: chunks[1],
            info: chunks[2],
            content: chunks[3],
            status: chunks[4],
        }
    }
}

/// Render the complete UI.
///
/// # Details
/// The content region shows the active tab's table, or the charts on the
/// analytics tab.
pub fn render_ui(f: &mut Frame, app: &App) {
    let layout = ScreenLayout::new(f.area());
    let buf = f.buffer_mut();

    render_tabs(app, layout.tabs, buf);
    render_search(app, layout.search, buf);
    render_view_info(app, layout.info, buf);

    match app.active_tab {
        Tab::Analytics => render_analytics(app, layout.content, buf),
        Tab::PullRequests | Tab::Issues | Tab::Repositories | Tab::Organizations | Tab::Starred => {
            render_list(app, layout.content, buf)
        }
    }

    let status_text = app.status_message.as_deref().unwrap_or(KEY_HINTS);
    let status = Paragraph::new(Line::from(status_text))
        .block(Block::default().borders(Borders::ALL));
    Widget::render(status, layout.status, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::Preferences;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_layout_fills_area() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.tabs.height, 3);
        assert_eq!(layout.content.height, 30 - 12);
        assert_eq!(layout.status.y, 27);
    }

    #[test]
    fn test_render_every_tab() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut app = App::new(Preferences::default(), 6, Tab::PullRequests);
        for tab in Tab::ALL {
            app.switch_tab(tab);
            terminal.draw(|f| render_ui(f, &app)).unwrap();
        }
    }
}
