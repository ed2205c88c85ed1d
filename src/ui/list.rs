//! Activity table rendering.
//!
//! Displays the filtered rows of the active list tab with selection highlighting.

use crate::app::{App, Tab};
use crate::github::models::format_count;
use crate::github::{IssueState, PrState};
use crate::theme::Palette;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

/// Render the table of the active list tab.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Empty views show a message that tells "nothing fetched" apart from
/// "nothing matches the query".
pub fn render_list(app: &App, area: Rect, buf: &mut Buffer) {
    let tab = app.active_tab;
    let palette = app.theme.palette();
    let title = format!(
        "{} ({}/{})",
        tab.title(),
        app.visible_len(tab),
        app.source_len(tab)
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    if let Some(empty) = app.empty_state(tab) {
        let message = if app.is_loading() && app.source_len(tab) == 0 {
            "Loading...".to_string()
        } else {
            empty.message(tab.noun())
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(palette.muted),
        )))
        .alignment(Alignment::Center)
        .block(block);
        Widget::render(paragraph, area, buf);
        return;
    }

    let (header, widths, rows) = match tab {
        Tab::PullRequests => pull_request_table(app, &palette),
        Tab::Issues => issue_table(app, &palette),
        Tab::Repositories => repository_table(app),
        Tab::Organizations => organization_table(app),
        Tab::Starred => starred_table(app),
        Tab::Analytics => return,
    };

    let header = Row::new(header).style(
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .style(Style::default().fg(palette.text))
        .row_highlight_style(
            Style::default()
                .fg(palette.selection_fg)
                .bg(palette.selection_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(app.selected_index()));
    StatefulWidget::render(table, area, buf, &mut state);
}

type TableParts = (Vec<&'static str>, Vec<Constraint>, Vec<Row<'static>>);

fn pr_state_cell(state: PrState, palette: &Palette) -> Cell<'static> {
    let color = match state {
        PrState::Open => palette.good,
        PrState::Merged => palette.merged,
        PrState::Closed => palette.bad,
    };
    Cell::from(Span::styled(state.label(), Style::default().fg(color)))
}

fn issue_state_cell(state: IssueState, palette: &Palette) -> Cell<'static> {
    let color = match state {
        IssueState::Open => palette.good,
        IssueState::Closed => palette.bad,
    };
    Cell::from(Span::styled(state.label(), Style::default().fg(color)))
}

fn work_item_widths() -> Vec<Constraint> {
    vec![
        Constraint::Length(7),
        Constraint::Percentage(40),
        Constraint::Percentage(15),
        Constraint::Length(7),
        Constraint::Length(13),
        Constraint::Length(5),
        Constraint::Percentage(20),
    ]
}

fn pull_request_table(app: &App, palette: &Palette) -> TableParts {
    let rows = app
        .views
        .pull_requests
        .iter()
        .map(|pr| {
            Row::new(vec![
                pr_state_cell(pr.state, palette),
                Cell::from(pr.title.clone()),
                Cell::from(pr.repository.clone()),
                Cell::from(format!("#{}", pr.number)),
                Cell::from(pr.created.clone()),
                Cell::from(pr.days_open.to_string()),
                Cell::from(pr.labels.clone()),
            ])
        })
        .collect();

    (
        vec!["State", "Title", "Repository", "Number", "Created", "Days", "Labels"],
        work_item_widths(),
        rows,
    )
}

fn issue_table(app: &App, palette: &Palette) -> TableParts {
    let rows = app
        .views
        .issues
        .iter()
        .map(|issue| {
            Row::new(vec![
                issue_state_cell(issue.state, palette),
                Cell::from(issue.title.clone()),
                Cell::from(issue.repository.clone()),
                Cell::from(format!("#{}", issue.number)),
                Cell::from(issue.created.clone()),
                Cell::from(issue.days_open.to_string()),
                Cell::from(issue.labels.clone()),
            ])
        })
        .collect();

    (
        vec!["State", "Title", "Repository", "Number", "Created", "Days", "Labels"],
        work_item_widths(),
        rows,
    )
}

fn repository_table(app: &App) -> TableParts {
    let rows = app
        .views
        .repositories
        .iter()
        .map(|repo| {
            let mut name = repo.name.clone();
            if repo.is_private {
                name.push_str(" [private]");
            }
            if repo.is_fork {
                name.push_str(" [fork]");
            }
            Row::new(vec![
                name,
                repo.language.clone().unwrap_or_default(),
                repo.format_stars(),
                format_count(repo.forks),
                repo.format_updated(),
                repo.topics.join(", "),
            ])
        })
        .collect();

    (
        vec!["Name", "Language", "Stars", "Forks", "Updated", "Topics"],
        vec![
            Constraint::Percentage(30),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(13),
            Constraint::Percentage(30),
        ],
        rows,
    )
}

fn organization_table(app: &App) -> TableParts {
    let rows = app
        .views
        .organizations
        .iter()
        .map(|org| {
            Row::new(vec![
                org.display_name().to_string(),
                org.login.clone(),
                org.description.clone().unwrap_or_default(),
            ])
        })
        .collect();

    (
        vec!["Name", "Login", "Description"],
        vec![
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Percentage(55),
        ],
        rows,
    )
}

fn starred_table(app: &App) -> TableParts {
    let rows = app
        .views
        .starred
        .iter()
        .map(|repo| {
            Row::new(vec![
                repo.name.clone(),
                repo.language.clone().unwrap_or_default(),
                repo.format_stars(),
                repo.format_updated(),
                repo.description.clone().unwrap_or_default(),
            ])
        })
        .collect();

    (
        vec!["Name", "Language", "Stars", "Updated", "Description"],
        vec![
            Constraint::Percentage(25),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(13),
            Constraint::Percentage(45),
        ],
        rows,
    )
}
