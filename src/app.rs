//! Application state management.
//!
//! Holds the fetched snapshot, per-tab search and sort settings, the derived
//! views shown in each tab, the monthly metrics and the UI mode.

use crate::filter::{EmptyState, Listing, SortOption, filter_and_sort};
use crate::github::{
    ActivitySnapshot, GitHubClient, GitHubError, Issue, Organization, PullRequest, Repository,
    StarredRepository,
};
use crate::metrics::{MonthlyMetrics, compute_monthly_metrics};
use crate::preferences::Preferences;
use crate::theme::Theme;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio::task::JoinHandle;

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Normal list navigation
    List,
    /// Typing into the search bar of the active tab
    Search,
}

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    PullRequests,
    Issues,
    Repositories,
    Organizations,
    Starred,
    /// Monthly charts and summary cards
    Analytics,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 6] = [
        Tab::PullRequests,
        Tab::Issues,
        Tab::Repositories,
        Tab::Organizations,
        Tab::Starred,
        Tab::Analytics,
    ];

    /// Parse a tab name from config.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pulls" | "prs" | "pull_requests" | "pull-requests" => Some(Tab::PullRequests),
            "issues" => Some(Tab::Issues),
            "repos" | "repositories" => Some(Tab::Repositories),
            "orgs" | "organizations" => Some(Tab::Organizations),
            "starred" | "stars" => Some(Tab::Starred),
            "analytics" | "metrics" => Some(Tab::Analytics),
            _ => None,
        }
    }

    /// Header label.
    pub fn title(self) -> &'static str {
        match self {
            Tab::PullRequests => "Pull Requests",
            Tab::Issues => "Issues",
            Tab::Repositories => "Repositories",
            Tab::Organizations => "Organizations",
            Tab::Starred => "Starred",
            Tab::Analytics => "Analytics",
        }
    }

    /// Plural noun used in empty-state messages.
    pub fn noun(self) -> &'static str {
        match self {
            Tab::PullRequests => "pull requests",
            Tab::Issues => "issues",
            Tab::Repositories => "repositories",
            Tab::Organizations => "organizations",
            Tab::Starred => "starred repositories",
            Tab::Analytics => "metrics",
        }
    }

    /// Sort options offered on this tab; empty for analytics.
    pub fn sort_options(self) -> &'static [SortOption] {
        match self {
            Tab::PullRequests => PullRequest::SORT_OPTIONS,
            Tab::Issues => Issue::SORT_OPTIONS,
            Tab::Repositories => Repository::SORT_OPTIONS,
            Tab::Organizations => Organization::SORT_OPTIONS,
            Tab::Starred => StarredRepository::SORT_OPTIONS,
            Tab::Analytics => &[],
        }
    }

    /// Position in [`Tab::ALL`].
    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Search, sort and selection of one list tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_query: String,
    pub sort: SortOption,
    /// Selected row in the filtered view
    pub selected_index: usize,
}

impl ViewState {
    fn new(sort: SortOption) -> Self {
        Self {
            search_query: String::new(),
            sort,
            selected_index: 0,
        }
    }
}

/// One [`ViewState`] per list tab.
#[derive(Debug, Clone)]
pub struct ViewStates {
    pull_requests: ViewState,
    issues: ViewState,
    repositories: ViewState,
    organizations: ViewState,
    starred: ViewState,
}

impl Default for ViewStates {
    fn default() -> Self {
        Self {
            pull_requests: ViewState::new(PullRequest::default_sort()),
            issues: ViewState::new(Issue::default_sort()),
            repositories: ViewState::new(Repository::default_sort()),
            organizations: ViewState::new(Organization::default_sort()),
            starred: ViewState::new(StarredRepository::default_sort()),
        }
    }
}

impl ViewStates {
    pub fn get(&self, tab: Tab) -> Option<&ViewState> {
        match tab {
            Tab::PullRequests => Some(&self.pull_requests),
            Tab::Issues => Some(&self.issues),
            Tab::Repositories => Some(&self.repositories),
            Tab::Organizations => Some(&self.organizations),
            Tab::Starred => Some(&self.starred),
            Tab::Analytics => None,
        }
    }

    pub fn get_mut(&mut self, tab: Tab) -> Option<&mut ViewState> {
        match tab {
            Tab::PullRequests => Some(&mut self.pull_requests),
            Tab::Issues => Some(&mut self.issues),
            Tab::Repositories => Some(&mut self.repositories),
            Tab::Organizations => Some(&mut self.organizations),
            Tab::Starred => Some(&mut self.starred),
            Tab::Analytics => None,
        }
    }
}

/// Filtered and sorted rows of each list tab.
#[derive(Debug, Clone, Default)]
pub struct FilteredViews {
    pub pull_requests: Vec<PullRequest>,
    pub issues: Vec<Issue>,
    pub repositories: Vec<Repository>,
    pub organizations: Vec<Organization>,
    pub starred: Vec<StarredRepository>,
}

/// Main application state.
///
/// An explicit context passed to the event loop and the widgets. Created with
/// [`App::new`] and torn down with [`App::shutdown`].
#[derive(Debug)]
pub struct App {
    /// Data from the last successful fetch
    pub snapshot: ActivitySnapshot,
    /// Derived rows per list tab
    pub views: FilteredViews,
    /// Search/sort/selection per list tab
    pub view_states: ViewStates,
    /// Series for the analytics tab
    pub metrics: MonthlyMetrics,
    /// Months covered by `metrics`
    pub window_months: u32,
    /// Current UI mode
    pub mode: UiMode,
    /// Active tab
    pub active_tab: Tab,
    /// Status message to display
    pub status_message: Option<String>,
    /// Persisted preferences
    pub preferences: Preferences,
    /// Theme derived from preferences
    pub theme: Theme,
    /// Pending fetch (for non-blocking refresh)
    pub fetch_task: Option<JoinHandle<Result<ActivitySnapshot, GitHubError>>>,
}

impl App {
    /// Create a new application state.
    ///
    /// # Arguments
    /// * `preferences` - Loaded preferences (theme)
    /// * `window_months` - Months shown in the analytics tab
    /// * `active_tab` - Tab shown first
    pub fn new(preferences: Preferences, window_months: u32, active_tab: Tab) -> Self {
        let theme = preferences.theme();
        Self {
            snapshot: ActivitySnapshot::default(),
            views: FilteredViews::default(),
            view_states: ViewStates::default(),
            metrics: MonthlyMetrics::default(),
            window_months,
            mode: UiMode::List,
            active_tab,
            status_message: None,
            preferences,
            theme,
            fetch_task: None,
        }
    }

    /// Start every list tab that offers `sort` with it; other tabs keep their default.
    pub fn with_default_sort(mut self, sort: SortOption) -> Self {
        for tab in Tab::ALL {
            let offered = tab.sort_options().contains(&sort);
            if let Some(state) = self.view_states.get_mut(tab)
                && offered
            {
                state.sort = sort;
            }
        }
        self
    }

    /// Replace the snapshot and recompute every derived view.
    ///
    /// # Arguments
    /// * `snapshot` - Freshly fetched data
    /// * `now` - Reference time for the monthly metrics
    pub fn set_snapshot(&mut self, snapshot: ActivitySnapshot, now: DateTime<Utc>) {
        self.snapshot = snapshot;
        for tab in Tab::ALL {
            self.refresh_view(tab);
        }
        self.metrics = compute_monthly_metrics(
            &self.snapshot.pull_requests,
            &self.snapshot.issues,
            self.window_months,
            now,
        );
    }

    /// Recompute the active tab after its query or sort changed.
    pub fn apply_filters(&mut self) {
        self.refresh_view(self.active_tab);
    }

    /// Recompute the filtered rows of `tab` and clamp its selection.
    fn refresh_view(&mut self, tab: Tab) {
        let Some(state) = self.view_states.get(tab) else {
            return;
        };
        let (query, sort) = (state.search_query.as_str(), state.sort);

        let len = match tab {
            Tab::PullRequests => {
                self.views.pull_requests =
                    filter_and_sort(&self.snapshot.pull_requests, query, sort);
                self.views.pull_requests.len()
            }
            Tab::Issues => {
                self.views.issues = filter_and_sort(&self.snapshot.issues, query, sort);
                self.views.issues.len()
            }
            Tab::Repositories => {
                self.views.repositories = filter_and_sort(&self.snapshot.repositories, query, sort);
                self.views.repositories.len()
            }
            Tab::Organizations => {
                self.views.organizations =
                    filter_and_sort(&self.snapshot.organizations, query, sort);
                self.views.organizations.len()
            }
            Tab::Starred => {
                self.views.starred = filter_and_sort(&self.snapshot.starred, query, sort);
                self.views.starred.len()
            }
            Tab::Analytics => return,
        };

        if let Some(state) = self.view_states.get_mut(tab) {
            state.selected_index = state.selected_index.min(len.saturating_sub(1));
        }
    }

    /// Number of rows currently shown in `tab`.
    pub fn visible_len(&self, tab: Tab) -> usize {
        match tab {
            Tab::PullRequests => self.views.pull_requests.len(),
            Tab::Issues => self.views.issues.len(),
            Tab::Repositories => self.views.repositories.len(),
            Tab::Organizations => self.views.organizations.len(),
            Tab::Starred => self.views.starred.len(),
            Tab::Analytics => self.metrics.labels.len(),
        }
    }

    /// Number of items in the snapshot for `tab`.
    pub fn source_len(&self, tab: Tab) -> usize {
        match tab {
            Tab::PullRequests => self.snapshot.pull_requests.len(),
            Tab::Issues => self.snapshot.issues.len(),
            Tab::Repositories => self.snapshot.repositories.len(),
            Tab::Organizations => self.snapshot.organizations.len(),
            Tab::Starred => self.snapshot.starred.len(),
            Tab::Analytics => self.metrics.labels.len(),
        }
    }

    /// Why `tab` shows no rows, if it shows none.
    pub fn empty_state(&self, tab: Tab) -> Option<EmptyState> {
        let query = self
            .view_states
            .get(tab)
            .map(|s| s.search_query.as_str())
            .unwrap_or_default();
        EmptyState::classify(self.source_len(tab), self.visible_len(tab), query)
    }

    /// View state of the active tab, `None` on analytics.
    pub fn active_view_state(&self) -> Option<&ViewState> {
        self.view_states.get(self.active_tab)
    }

    /// Selected row index of the active tab.
    pub fn selected_index(&self) -> usize {
        self.active_view_state()
            .map(|s| s.selected_index)
            .unwrap_or(0)
    }

    /// Move selection up.
    ///
    /// # Details
    /// Decrements selected index, wrapping to bottom if at top.
    pub fn move_up(&mut self) {
        let len = self.visible_len(self.active_tab);
        if let Some(state) = self.view_states.get_mut(self.active_tab)
            && len > 0
        {
            state.selected_index = if state.selected_index == 0 {
                len - 1
            } else {
                state.selected_index - 1
            };
        }
    }

    /// Move selection down.
    ///
    /// # Details
    /// Increments selected index, wrapping to top if at bottom.
    pub fn move_down(&mut self) {
        let len = self.visible_len(self.active_tab);
        if let Some(state) = self.view_states.get_mut(self.active_tab)
            && len > 0
        {
            state.selected_index = (state.selected_index + 1) % len;
        }
    }

    /// Add a character to the active tab's search query.
    ///
    /// # Details
    /// Only works in Search mode. Applies filters after adding character.
    pub fn add_search_char(&mut self, ch: char) {
        if self.mode != UiMode::Search {
            return;
        }
        if let Some(state) = self.view_states.get_mut(self.active_tab) {
            state.search_query.push(ch);
            state.selected_index = 0;
            self.apply_filters();
        }
    }

    /// Remove last character from the active tab's search query.
    pub fn remove_search_char(&mut self) {
        if self.mode != UiMode::Search {
            return;
        }
        if let Some(state) = self.view_states.get_mut(self.active_tab) {
            state.search_query.pop();
            self.apply_filters();
        }
    }

    /// Clear the active tab's search query.
    pub fn clear_search(&mut self) {
        if let Some(state) = self.view_states.get_mut(self.active_tab) {
            state.search_query.clear();
            self.apply_filters();
        }
    }

    /// Cycle to the next sort option of the active tab.
    pub fn cycle_sort(&mut self) {
        let options = self.active_tab.sort_options();
        if let Some(state) = self.view_states.get_mut(self.active_tab) {
            state.sort = state.sort.cycle(options);
            self.apply_filters();
        }
    }

    /// Sort option name of the active tab, `None` on analytics.
    pub fn sort_name(&self) -> Option<&'static str> {
        self.active_view_state().map(|s| s.sort.label())
    }

    /// Switch to a different tab.
    ///
    /// # Details
    /// Leaves search mode; each tab keeps its own query and selection.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.mode = UiMode::List;
    }

    /// URL of the selected row in the active tab.
    pub fn selected_url(&self) -> Option<&str> {
        let idx = self.selected_index();
        match self.active_tab {
            Tab::PullRequests => self.views.pull_requests.get(idx).map(|p| p.url.as_str()),
            Tab::Issues => self.views.issues.get(idx).map(|i| i.url.as_str()),
            Tab::Repositories => self.views.repositories.get(idx).map(|r| r.url.as_str()),
            Tab::Organizations => self.views.organizations.get(idx).map(|o| o.url.as_str()),
            Tab::Starred => self.views.starred.get(idx).map(|s| s.url.as_str()),
            Tab::Analytics => None,
        }
    }

    /// Flip between dark and light theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.preferences.set_theme(self.theme);
        self.theme
    }

    /// Set status message.
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Clear status message.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Whether a refresh is running.
    pub fn is_loading(&self) -> bool {
        self.fetch_task.is_some()
    }

    /// Start a background refresh unless one is already running.
    pub fn start_fetch(&mut self, client: &GitHubClient) {
        if self.is_loading() {
            return;
        }
        let client = client.clone();
        self.fetch_task = Some(tokio::spawn(async move { client.fetch_snapshot().await }));
        self.set_status("Fetching GitHub activity...".to_string());
    }

    /// Collect a finished refresh, if any.
    ///
    /// # Details
    /// Leaves a running task in place. On failure the previous snapshot stays
    /// on screen and the error goes to the status bar.
    pub async fn poll_fetch(&mut self) {
        if !self.fetch_task.as_ref().is_some_and(|task| task.is_finished()) {
            return;
        }
        let Some(task) = self.fetch_task.take() else {
            return;
        };

        match task.await {
            Ok(Ok(snapshot)) => {
                let login = snapshot.login.clone();
                self.set_snapshot(snapshot, Utc::now());
                self.set_status(format!(
                    "Loaded activity for {}: {} PRs, {} issues, {} repositories",
                    login,
                    self.snapshot.pull_requests.len(),
                    self.snapshot.issues.len(),
                    self.snapshot.repositories.len()
                ));
            }
            Ok(Err(e)) => {
                tracing::error!("Fetch failed: {}", e);
                self.set_status(format!("Error fetching activity: {}", e));
            }
            Err(e) => {
                tracing::error!("Fetch task failed: {}", e);
                self.set_status(format!("Error fetching activity: {}", e));
            }
        }
    }

    /// Tear down: stop a running fetch and persist preferences.
    pub fn shutdown(&mut self, preferences_path: &Path) -> Result<()> {
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        self.preferences.save(preferences_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{IssueState, PrState};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn pull_request(title: &str, day: u32, state: PrState) -> PullRequest {
        let created = Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap();
        PullRequest {
            title: title.to_string(),
            repository: "widgets".to_string(),
            number: u64::from(day),
            url: format!("https://github.com/octo/widgets/pull/{}", day),
            state,
            created_at: Some(created),
            closed_at: (state == PrState::Merged).then(|| created + chrono::Duration::days(1)),
            created: String::new(),
            updated: String::new(),
            days_open: 1,
            labels: String::new(),
        }
    }

    fn issue(title: &str) -> Issue {
        Issue {
            title: title.to_string(),
            repository: "widgets".to_string(),
            number: 1,
            url: "https://github.com/octo/widgets/issues/1".to_string(),
            state: IssueState::Open,
            created_at: None,
            closed_at: None,
            created: String::new(),
            updated: String::new(),
            days_open: 0,
            labels: String::new(),
        }
    }

    fn test_app() -> App {
        let mut app = App::new(Preferences::default(), 6, Tab::PullRequests);
        let snapshot = ActivitySnapshot {
            login: "octocat".to_string(),
            pull_requests: vec![
                pull_request("Add parser", 1, PrState::Merged),
                pull_request("Fix crash", 5, PrState::Open),
                pull_request("Bump deps", 3, PrState::Merged),
            ],
            issues: vec![issue("Crash on start"), issue("Docs typo")],
            ..ActivitySnapshot::default()
        };
        app.set_snapshot(snapshot, now());
        app
    }

    #[test]
    fn test_app_new() {
        let app = App::new(Preferences::default(), 6, Tab::Issues);
        assert_eq!(app.active_tab, Tab::Issues);
        assert_eq!(app.mode, UiMode::List);
        assert_eq!(app.theme, Theme::Dark);
        assert!(!app.is_loading());
        assert_eq!(app.selected_index(), 0);
    }

    #[test]
    fn test_set_snapshot_builds_views_and_metrics() {
        let app = test_app();
        let titles: Vec<_> = app
            .views
            .pull_requests
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Fix crash", "Bump deps", "Add parser"]);
        assert_eq!(app.views.issues.len(), 2);
        assert_eq!(app.metrics.labels.len(), 6);
        assert_eq!(app.metrics.review_efficiency[5], Some(66.7));
        assert_eq!(app.metrics.pr_merge_time[5], Some(1.0));
    }

    #[test]
    fn test_with_default_sort_skips_tabs_without_it() {
        let app = App::new(Preferences::default(), 6, Tab::PullRequests)
            .with_default_sort(SortOption::parse("za"));
        assert_eq!(app.view_states.get(Tab::Issues).unwrap().sort, SortOption::Za);
        assert_eq!(app.view_states.get(Tab::Starred).unwrap().sort, SortOption::Za);

        let app = App::new(Preferences::default(), 6, Tab::PullRequests)
            .with_default_sort(SortOption::parse("stars"));
        assert_eq!(app.view_states.get(Tab::Starred).unwrap().sort, SortOption::Stars);
        assert_eq!(
            app.view_states.get(Tab::Repositories).unwrap().sort,
            SortOption::Newest
        );
    }

    #[test]
    fn test_search_is_per_tab() {
        let mut app = test_app();
        app.mode = UiMode::Search;
        for ch in "crash".chars() {
            app.add_search_char(ch);
        }
        assert_eq!(app.views.pull_requests.len(), 1);
        assert_eq!(app.views.pull_requests[0].title, "Fix crash");

        app.switch_tab(Tab::Issues);
        assert_eq!(app.mode, UiMode::List);
        assert_eq!(app.views.issues.len(), 2);
        assert_eq!(app.active_view_state().unwrap().search_query, "");

        app.switch_tab(Tab::PullRequests);
        assert_eq!(app.active_view_state().unwrap().search_query, "crash");

        app.mode = UiMode::Search;
        app.remove_search_char();
        assert_eq!(app.active_view_state().unwrap().search_query, "cras");
        app.clear_search();
        assert_eq!(app.views.pull_requests.len(), 3);
    }

    #[test]
    fn test_search_ignored_outside_search_mode() {
        let mut app = test_app();
        app.add_search_char('x');
        assert_eq!(app.active_view_state().unwrap().search_query, "");
    }

    #[test]
    fn test_cycle_sort() {
        let mut app = test_app();
        assert_eq!(app.sort_name(), Some("Newest"));
        app.cycle_sort();
        assert_eq!(app.sort_name(), Some("Oldest"));
        assert_eq!(app.views.pull_requests[0].title, "Add parser");
        app.cycle_sort();
        assert_eq!(app.active_view_state().unwrap().sort, SortOption::Az);
        assert_eq!(app.views.pull_requests[0].title, "Add parser");
        assert_eq!(app.views.pull_requests[1].title, "Bump deps");

        app.switch_tab(Tab::Starred);
        assert_eq!(app.sort_name(), Some("Most stars"));
        app.cycle_sort();
        assert_eq!(app.sort_name(), Some("Oldest"));

        app.switch_tab(Tab::Analytics);
        app.cycle_sort();
        assert_eq!(app.sort_name(), None);
    }

    #[test]
    fn test_move_selection_wraps() {
        let mut app = test_app();
        assert_eq!(app.selected_index(), 0);
        app.move_down();
        assert_eq!(app.selected_index(), 1);
        app.move_up();
        assert_eq!(app.selected_index(), 0);
        app.move_up();
        assert_eq!(app.selected_index(), 2);
        app.move_down();
        assert_eq!(app.selected_index(), 0);
    }

    #[test]
    fn test_selection_clamped_after_filter() {
        let mut app = test_app();
        app.move_up();
        assert_eq!(app.selected_index(), 2);
        app.mode = UiMode::Search;
        app.add_search_char('f');
        assert_eq!(app.selected_index(), 0);
    }

    #[test]
    fn test_selected_url() {
        let mut app = test_app();
        assert_eq!(
            app.selected_url(),
            Some("https://github.com/octo/widgets/pull/5")
        );
        app.switch_tab(Tab::Starred);
        assert_eq!(app.selected_url(), None);
        app.switch_tab(Tab::Analytics);
        assert_eq!(app.selected_url(), None);
    }

    #[test]
    fn test_empty_states() {
        let mut app = test_app();
        assert_eq!(app.empty_state(Tab::Starred), Some(EmptyState::NoData));
        assert_eq!(app.empty_state(Tab::PullRequests), None);

        app.mode = UiMode::Search;
        app.add_search_char('z');
        assert_eq!(
            app.empty_state(Tab::PullRequests),
            Some(EmptyState::NoMatches("z".to_string()))
        );
    }

    #[test]
    fn test_tab_navigation() {
        assert_eq!(Tab::PullRequests.next(), Tab::Issues);
        assert_eq!(Tab::Analytics.next(), Tab::PullRequests);
        assert_eq!(Tab::PullRequests.previous(), Tab::Analytics);
        assert_eq!(Tab::parse("repos"), Some(Tab::Repositories));
        assert_eq!(Tab::parse("Starred"), Some(Tab::Starred));
        assert_eq!(Tab::parse("wiki"), None);
        assert!(Tab::Analytics.sort_options().is_empty());
    }

    #[test]
    fn test_toggle_theme_and_shutdown_persist() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        let mut app = test_app();
        assert_eq!(app.toggle_theme(), Theme::Light);
        app.shutdown(&path).unwrap();

        let reloaded = Preferences::load(&path).unwrap();
        assert_eq!(reloaded.theme(), Theme::Light);
        assert_eq!(App::new(reloaded, 6, Tab::Issues).theme, Theme::Light);
    }
}
