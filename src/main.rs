//! GitHub Activity TUI - Terminal dashboard for a user's GitHub activity.
//!
//! Main entry point and event loop for the application.

mod app;
mod browser;
mod config;
mod filter;
mod github;
mod logging;
mod metrics;
mod preferences;
mod theme;
mod ui;

use anyhow::Context;
use app::{App, Tab, UiMode};
use browser::open_in_browser;
use clap::Parser;
use config::{Config, TOKEN_ENV};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use filter::SortOption;
use github::{GitHubClient, GitHubError};
use preferences::Preferences;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "gh-activity-tui", version, about)]
struct Cli {
    /// Config file (defaults to <config dir>/gh-activity-tui/config.jsonc)
    #[arg(short, long, env = "GH_ACTIVITY_CONFIG")]
    config: Option<PathBuf>,

    /// Write debug-level logs
    #[arg(short, long)]
    verbose: bool,
}

/// What the event loop should do after handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
    Refresh,
}

/// Main application entry point.
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Loads configuration and preferences, starts the first fetch in the
/// background, and runs the event loop until the user quits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    let log_path = config.log_file_path()?;
    logging::init_logging(&log_path, cli.verbose)?;
    tracing::info!("Starting gh-activity-tui");

    // Load preferences
    let preferences_path = config.preferences_file_path()?;
    let preferences = Preferences::load(&preferences_path)?;

    // Create GitHub client
    let token = config.resolve_token(std::env::var(TOKEN_ENV).ok());
    let client = match GitHubClient::new(&config, token) {
        Ok(client) => client,
        Err(GitHubError::MissingToken) => {
            eprintln!("Error: a GitHub token is required.");
            eprintln!(
                "Set github_token in {} or export {}.",
                Config::default_config_path()?.display(),
                TOKEN_ENV
            );
            return Err(anyhow::anyhow!("GitHub token not configured"));
        }
        Err(e) => return Err(e.into()),
    };

    // Create application state
    let active_tab = Tab::parse(&config.default_tab).unwrap_or(Tab::PullRequests);
    let mut app = App::new(preferences, config.metrics_window_months, active_tab)
        .with_default_sort(SortOption::parse(&config.default_sort));
    app.start_fetch(&client);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app, &client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = app.shutdown(&preferences_path) {
        tracing::warn!("Failed to save preferences: {:#}", e);
    }
    tracing::info!("Exiting");

    result
}

/// Main event loop.
///
/// # Arguments
/// * `terminal` - Terminal instance
/// * `app` - Application state
/// * `client` - GitHub client used for refreshes
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Redraws, collects a finished fetch, then handles at most one input event.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &GitHubClient,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| {
            ui::render_ui(f, app);
        })?;

        app.poll_fetch().await;

        // Use non-blocking event polling with timeout to keep UI responsive
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(key, app),
            Event::Mouse(mouse) => {
                handle_mouse_event(mouse, app);
                Action::Continue
            }
            _ => Action::Continue,
        };

        match action {
            Action::Continue => {}
            Action::Quit => break,
            Action::Refresh => {
                if app.is_loading() {
                    app.set_status("A refresh is already running".to_string());
                } else {
                    tracing::info!("Manual refresh");
                    app.start_fetch(client);
                }
            }
        }
    }

    Ok(())
}

/// Handle a key press.
///
/// # Arguments
/// * `key` - Key event
/// * `app` - Application state
///
/// # Returns
/// * `Action` - What the event loop should do next
fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.mode {
        UiMode::List => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => app.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.move_down(),
            KeyCode::Tab => app.switch_tab(app.active_tab.next()),
            KeyCode::BackTab => app.switch_tab(app.active_tab.previous()),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                app.switch_tab(Tab::ALL[idx]);
            }
            KeyCode::Char('/') => {
                if app.active_view_state().is_some() {
                    app.mode = UiMode::Search;
                    app.clear_status();
                }
            }
            KeyCode::Char('s') => {
                app.cycle_sort();
                if let Some(sort) = app.sort_name() {
                    app.set_status(format!("Sort: {}", sort));
                }
            }
            KeyCode::Char('t') => {
                let theme = app.toggle_theme();
                app.set_status(format!("Theme: {}", theme.as_str()));
            }
            KeyCode::Char('r') => return Action::Refresh,
            KeyCode::Enter => open_selected(app),
            _ => {}
        },
        UiMode::Search => match key.code {
            KeyCode::Enter => {
                app.mode = UiMode::List;
            }
            KeyCode::Esc => {
                app.clear_search();
                app.mode = UiMode::List;
            }
            KeyCode::Backspace => {
                app.remove_search_char();
            }
            KeyCode::Char(c) => {
                app.add_search_char(c);
            }
            _ => {}
        },
    }

    Action::Continue
}

/// Open the selected row of the active tab in the browser.
fn open_selected(app: &mut App) {
    let Some(url) = app.selected_url().map(str::to_string) else {
        return;
    };
    match open_in_browser(&url) {
        Ok(()) => app.set_status(format!("Opened: {}", url)),
        Err(e) => {
            tracing::warn!("Failed to open {}: {:#}", url, e);
            app.set_status(format!("Failed to open browser: {}", e));
        }
    }
}

/// Handle mouse events.
///
/// # Details
/// Scrolling moves the selection of the active list tab.
fn handle_mouse_event(mouse: MouseEvent, app: &mut App) {
    if app.mode != UiMode::List {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => app.move_up(),
        MouseEventKind::ScrollDown => app.move_down(),
        _ => {}
    }
}
