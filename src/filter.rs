//! Search and ordering of activity collections.
//!
//! Every list tab runs its collection through [`filter_and_sort`]. The result is a
//! fresh vector; the source slice is never reordered.

use crate::github::{Issue, Organization, PullRequest, Repository, StarredRepository};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Sort option selectable per tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    /// Most recent first
    Newest,
    /// Least recent first
    Oldest,
    /// Name/title ascending
    Az,
    /// Name/title descending
    Za,
    /// Star count descending (starred repositories only)
    Stars,
}

impl SortOption {
    /// Parse a sort option; anything unrecognized falls back to `Newest`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "oldest" => SortOption::Oldest,
            "az" => SortOption::Az,
            "za" => SortOption::Za,
            "stars" => SortOption::Stars,
            _ => SortOption::Newest,
        }
    }

    /// Human readable name for the status panel.
    pub fn label(self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::Oldest => "Oldest",
            SortOption::Az => "Name (A-Z)",
            SortOption::Za => "Name (Z-A)",
            SortOption::Stars => "Most stars",
        }
    }

    /// Next option in `options`, wrapping around.
    ///
    /// An option not in the list moves to the first entry.
    pub fn cycle(self, options: &[SortOption]) -> SortOption {
        match options.iter().position(|o| *o == self) {
            Some(idx) => options[(idx + 1) % options.len()],
            None => options.first().copied().unwrap_or(SortOption::Newest),
        }
    }
}

/// An entity that can be searched and ordered in a list tab.
pub trait Listing: Clone {
    /// Sort options offered for this type, default first.
    const SORT_OPTIONS: &'static [SortOption];

    /// Whether any searchable field contains `needle`.
    ///
    /// `needle` is already lowercased and non-empty.
    fn matches(&self, needle: &str) -> bool;

    /// Ordering of `self` relative to `other` under `sort`.
    fn compare(&self, other: &Self, sort: SortOption) -> Ordering;

    /// Default sort option for this type.
    fn default_sort() -> SortOption {
        Self::SORT_OPTIONS
            .first()
            .copied()
            .unwrap_or(SortOption::Newest)
    }
}

/// Filter `items` by `search_query` and order the survivors by `sort`.
///
/// # Arguments
/// * `items` - Source collection in fetch order
/// * `search_query` - Case-insensitive substring; empty means no filtering
/// * `sort` - Sort option, interpreted per type
///
/// # Returns
/// * `Vec<T>` - New filtered and ordered view
///
/// # Details
/// The sort is stable, so items comparing equal keep their fetch order.
pub fn filter_and_sort<T: Listing>(items: &[T], search_query: &str, sort: SortOption) -> Vec<T> {
    let needle = search_query.to_lowercase();
    let mut view: Vec<T> = if needle.is_empty() {
        items.to_vec()
    } else {
        items
            .iter()
            .filter(|item| item.matches(&needle))
            .cloned()
            .collect()
    };
    view.sort_by(|a, b| a.compare(b, sort));
    view
}

/// Why a filtered view came out empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// The source collection itself is empty
    NoData,
    /// The source has items but none match the query
    NoMatches(String),
}

impl EmptyState {
    /// Classify an empty view, or `None` when the view has rows.
    pub fn classify(source_len: usize, view_len: usize, search_query: &str) -> Option<Self> {
        if view_len > 0 {
            None
        } else if source_len == 0 || search_query.is_empty() {
            Some(EmptyState::NoData)
        } else {
            Some(EmptyState::NoMatches(search_query.to_string()))
        }
    }

    /// Message shown in place of the table.
    ///
    /// # Arguments
    /// * `noun` - Plural name of the listed entities, e.g. "starred repositories"
    pub fn message(&self, noun: &str) -> String {
        match self {
            EmptyState::NoData => format!("No {} available", noun),
            EmptyState::NoMatches(query) => format!("No {} match \"{}\"", noun, query),
        }
    }
}

fn contains(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

fn contains_opt(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| contains(f, needle))
}

/// Case-insensitive collation with a byte-order tie break.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compare timestamps; missing ones sort last in either direction.
fn compare_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn repository_matches(repo: &Repository, needle: &str) -> bool {
    contains(&repo.name, needle)
        || contains_opt(repo.description.as_deref(), needle)
        || contains_opt(repo.language.as_deref(), needle)
        || repo.topics.iter().any(|topic| contains(topic, needle))
}

impl Listing for PullRequest {
    const SORT_OPTIONS: &'static [SortOption] = &[
        SortOption::Newest,
        SortOption::Oldest,
        SortOption::Az,
        SortOption::Za,
    ];

    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle)
            || contains(&self.repository, needle)
            || contains(&self.labels, needle)
    }

    fn compare(&self, other: &Self, sort: SortOption) -> Ordering {
        match sort {
            SortOption::Oldest => compare_dates(self.created_at, other.created_at, false),
            SortOption::Az => compare_text(&self.title, &other.title),
            SortOption::Za => compare_text(&other.title, &self.title),
            SortOption::Newest | SortOption::Stars => {
                compare_dates(self.created_at, other.created_at, true)
            }
        }
    }
}

impl Listing for Issue {
    const SORT_OPTIONS: &'static [SortOption] = PullRequest::SORT_OPTIONS;

    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle)
            || contains(&self.repository, needle)
            || contains(&self.labels, needle)
    }

    fn compare(&self, other: &Self, sort: SortOption) -> Ordering {
        match sort {
            SortOption::Oldest => compare_dates(self.created_at, other.created_at, false),
            SortOption::Az => compare_text(&self.title, &other.title),
            SortOption::Za => compare_text(&other.title, &self.title),
            SortOption::Newest | SortOption::Stars => {
                compare_dates(self.created_at, other.created_at, true)
            }
        }
    }
}

impl Listing for Repository {
    const SORT_OPTIONS: &'static [SortOption] = PullRequest::SORT_OPTIONS;

    fn matches(&self, needle: &str) -> bool {
        repository_matches(self, needle)
    }

    fn compare(&self, other: &Self, sort: SortOption) -> Ordering {
        match sort {
            SortOption::Oldest => compare_dates(self.updated_at, other.updated_at, false),
            SortOption::Az => compare_text(&self.name, &other.name),
            SortOption::Za => compare_text(&other.name, &self.name),
            SortOption::Newest | SortOption::Stars => {
                compare_dates(self.updated_at, other.updated_at, true)
            }
        }
    }
}

impl Listing for StarredRepository {
    const SORT_OPTIONS: &'static [SortOption] = &[
        SortOption::Stars,
        SortOption::Oldest,
        SortOption::Az,
        SortOption::Za,
    ];

    fn matches(&self, needle: &str) -> bool {
        repository_matches(self, needle)
    }

    fn compare(&self, other: &Self, sort: SortOption) -> Ordering {
        match sort {
            SortOption::Oldest => compare_dates(self.updated_at, other.updated_at, false),
            SortOption::Az => compare_text(&self.name, &other.name),
            SortOption::Za => compare_text(&other.name, &self.name),
            SortOption::Newest | SortOption::Stars => other.stars.cmp(&self.stars),
        }
    }
}

impl Listing for Organization {
    const SORT_OPTIONS: &'static [SortOption] = &[SortOption::Az, SortOption::Za, SortOption::Newest];

    fn matches(&self, needle: &str) -> bool {
        contains(&self.login, needle)
            || contains_opt(self.name.as_deref(), needle)
            || contains_opt(self.description.as_deref(), needle)
    }

    fn compare(&self, other: &Self, sort: SortOption) -> Ordering {
        match sort {
            SortOption::Az => compare_text(self.display_name(), other.display_name()),
            SortOption::Za => compare_text(other.display_name(), self.display_name()),
            // No date field: the date-based options order by login
            SortOption::Newest | SortOption::Oldest | SortOption::Stars => {
                compare_text(&self.login, &other.login)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{IssueState, PrState};
    use chrono::TimeZone;

    fn day(d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap())
    }

    fn issue(title: &str, repository: &str, labels: &str, created: u32) -> Issue {
        Issue {
            title: title.to_string(),
            repository: repository.to_string(),
            number: created as u64,
            url: format!("https://github.com/octo/{}/issues/{}", repository, created),
            state: IssueState::Open,
            created_at: day(created),
            closed_at: None,
            created: String::new(),
            updated: String::new(),
            days_open: 0,
            labels: labels.to_string(),
        }
    }

    fn pull_request(title: &str, created: Option<DateTime<Utc>>) -> PullRequest {
        PullRequest {
            title: title.to_string(),
            repository: "widgets".to_string(),
            number: 1,
            url: String::new(),
            state: PrState::Open,
            created_at: created,
            closed_at: None,
            created: String::new(),
            updated: String::new(),
            days_open: 0,
            labels: String::new(),
        }
    }

    fn repo(name: &str, stars: u64, updated: u32) -> Repository {
        Repository {
            name: name.to_string(),
            description: None,
            language: None,
            topics: Vec::new(),
            stars,
            forks: 0,
            is_private: false,
            is_fork: false,
            created_at: day(1),
            updated_at: day(updated),
            url: String::new(),
        }
    }

    fn org(login: &str, name: Option<&str>, description: Option<&str>) -> Organization {
        Organization {
            login: login.to_string(),
            name: name.map(str::to_string),
            avatar_url: String::new(),
            url: String::new(),
            description: description.map(str::to_string),
        }
    }

    fn titles(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_sort_option_parse() {
        assert_eq!(SortOption::parse("za"), SortOption::Za);
        assert_eq!(SortOption::parse("Stars"), SortOption::Stars);
        assert_eq!(SortOption::parse("oldest"), SortOption::Oldest);
        assert_eq!(SortOption::parse("bogus"), SortOption::Newest);
        assert_eq!(SortOption::parse(""), SortOption::Newest);
    }

    #[test]
    fn test_sort_option_cycle() {
        let options = PullRequest::SORT_OPTIONS;
        assert_eq!(SortOption::Newest.cycle(options), SortOption::Oldest);
        assert_eq!(SortOption::Za.cycle(options), SortOption::Newest);
        assert_eq!(SortOption::Stars.cycle(options), SortOption::Newest);
        assert_eq!(StarredRepository::default_sort(), SortOption::Stars);
    }

    #[test]
    fn test_search_bug_returns_only_matching_issue() {
        let issues = vec![
            issue("Fix bug", "widgets", "", 1),
            issue("Add feature", "widgets", "", 2),
        ];
        let view = filter_and_sort(&issues, "bug", SortOption::Newest);
        assert_eq!(titles(&view), vec!["Fix bug"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let issues = vec![
            issue("Crash on start", "widgets", "", 1),
            issue("Slow render", "Gadgets", "", 2),
            issue("Typo", "docs", "Good First Issue", 3),
        ];
        assert_eq!(
            titles(&filter_and_sort(&issues, "CRASH", SortOption::Oldest)),
            vec!["Crash on start"]
        );
        assert_eq!(
            titles(&filter_and_sort(&issues, "gadg", SortOption::Oldest)),
            vec!["Slow render"]
        );
        assert_eq!(
            titles(&filter_and_sort(&issues, "first issue", SortOption::Oldest)),
            vec!["Typo"]
        );
    }

    #[test]
    fn test_filter_correctness_both_directions() {
        let issues = vec![
            issue("alpha", "one", "x", 1),
            issue("beta", "two", "alphabet", 2),
            issue("gamma", "three", "", 3),
        ];
        let view = filter_and_sort(&issues, "alpha", SortOption::Newest);
        for item in &issues {
            let included = view.iter().any(|v| v.number == item.number);
            assert_eq!(included, item.matches("alpha"));
        }
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_empty_query_is_identity_up_to_sort() {
        let issues = vec![
            issue("b", "r", "", 2),
            issue("c", "r", "", 3),
            issue("a", "r", "", 1),
        ];
        let view = filter_and_sort(&issues, "", SortOption::Oldest);
        assert_eq!(titles(&view), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_newest_orders_created_descending() {
        let issues = vec![
            issue("b", "r", "", 2),
            issue("c", "r", "", 9),
            issue("a", "r", "", 5),
        ];
        let view = filter_and_sort(&issues, "", SortOption::Newest);
        for pair in view.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_unknown_sort_behaves_as_newest() {
        let issues = vec![issue("b", "r", "", 2), issue("c", "r", "", 9)];
        let fallback = filter_and_sort(&issues, "", SortOption::parse("whatever"));
        let newest = filter_and_sort(&issues, "", SortOption::Newest);
        assert_eq!(fallback, newest);
    }

    #[test]
    fn test_filter_and_sort_does_not_mutate_input() {
        let issues = vec![
            issue("b", "r", "", 2),
            issue("c", "r", "", 3),
            issue("a", "r", "", 1),
        ];
        let before = issues.clone();
        let _ = filter_and_sort(&issues, "", SortOption::Az);
        let _ = filter_and_sort(&issues, "a", SortOption::Za);
        assert_eq!(issues, before);
    }

    #[test]
    fn test_missing_dates_sort_last() {
        let prs = vec![
            pull_request("undated", None),
            pull_request("early", day(1)),
            pull_request("late", day(20)),
        ];
        let newest: Vec<_> = filter_and_sort(&prs, "", SortOption::Newest)
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(newest, vec!["late", "early", "undated"]);
        let oldest: Vec<_> = filter_and_sort(&prs, "", SortOption::Oldest)
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(oldest, vec!["early", "late", "undated"]);
    }

    #[test]
    fn test_repositories_za() {
        let repos = vec![repo("alpha", 1, 1), repo("beta", 2, 2), repo("gamma", 3, 3)];
        let names: Vec<_> = filter_and_sort(&repos, "", SortOption::Za)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["gamma", "beta", "alpha"]);
    }

    #[test]
    fn test_az_is_case_insensitive() {
        let repos = vec![repo("beta", 0, 1), repo("Alpha", 0, 1), repo("alpine", 0, 1)];
        let names: Vec<_> = filter_and_sort(&repos, "", SortOption::Az)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "alpine", "beta"]);
        for pair in names.windows(2) {
            assert_ne!(compare_text(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn test_repository_newest_uses_updated() {
        let repos = vec![repo("stale", 0, 2), repo("fresh", 0, 25)];
        let names: Vec<_> = filter_and_sort(&repos, "", SortOption::Newest)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["fresh", "stale"]);
    }

    #[test]
    fn test_repository_search_fields() {
        let mut tui = repo("dashboard", 0, 1);
        tui.topics = vec!["terminal-ui".to_string(), "rust".to_string()];
        let mut web = repo("site", 0, 1);
        web.description = Some("Personal homepage".to_string());
        web.language = Some("TypeScript".to_string());
        let repos = vec![tui, web, repo("bare", 0, 1)];

        let by_topic = filter_and_sort(&repos, "TERMINAL", SortOption::Az);
        assert_eq!(by_topic.len(), 1);
        assert_eq!(by_topic[0].name, "dashboard");

        let by_language = filter_and_sort(&repos, "script", SortOption::Az);
        assert_eq!(by_language[0].name, "site");

        let by_description = filter_and_sort(&repos, "homepage", SortOption::Az);
        assert_eq!(by_description[0].name, "site");

        // Missing description/language never match
        assert!(filter_and_sort(&repos, "bar", SortOption::Az).len() == 1);
    }

    #[test]
    fn test_starred_defaults_to_star_count() {
        let starred = vec![
            StarredRepository(repo("small", 3, 9)),
            StarredRepository(repo("huge", 3000, 1)),
            StarredRepository(repo("mid", 300, 5)),
        ];
        for sort in [SortOption::Stars, SortOption::Newest] {
            let names: Vec<_> = filter_and_sort(&starred, "", sort)
                .into_iter()
                .map(|r| r.0.name)
                .collect();
            assert_eq!(names, vec!["huge", "mid", "small"]);
        }
    }

    #[test]
    fn test_equal_keys_keep_fetch_order() {
        let starred = vec![
            StarredRepository(repo("first", 50, 3)),
            StarredRepository(repo("second", 50, 9)),
            StarredRepository(repo("third", 50, 1)),
        ];
        let names: Vec<_> = filter_and_sort(&starred, "", SortOption::Stars)
            .into_iter()
            .map(|r| r.0.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);

        let prs = vec![
            pull_request("b", day(4)),
            pull_request("a", day(4)),
            pull_request("newer", day(7)),
            pull_request("c", day(4)),
        ];
        for sort in [SortOption::Newest, SortOption::Oldest] {
            let titles: Vec<_> = filter_and_sort(&prs, "", sort)
                .into_iter()
                .filter(|p| p.title != "newer")
                .map(|p| p.title)
                .collect();
            assert_eq!(titles, vec!["b", "a", "c"]);
        }
    }

    #[test]
    fn test_stars_on_repositories_falls_back_to_newest() {
        let repos = vec![repo("old", 900, 1), repo("new", 1, 20)];
        let names: Vec<_> = filter_and_sort(&repos, "", SortOption::Stars)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[test]
    fn test_empty_starred_is_no_data() {
        let starred: Vec<StarredRepository> = Vec::new();
        let view = filter_and_sort(&starred, "", SortOption::Stars);
        assert!(view.is_empty());
        let state = EmptyState::classify(starred.len(), view.len(), "");
        assert_eq!(state, Some(EmptyState::NoData));
        assert_eq!(
            state.unwrap().message("starred repositories"),
            "No starred repositories available"
        );
    }

    #[test]
    fn test_empty_state_no_matches() {
        let issues = vec![issue("Fix bug", "r", "", 1)];
        let view = filter_and_sort(&issues, "zzz", SortOption::Newest);
        let state = EmptyState::classify(issues.len(), view.len(), "zzz").unwrap();
        assert_eq!(state, EmptyState::NoMatches("zzz".to_string()));
        assert_eq!(state.message("issues"), "No issues match \"zzz\"");
        assert_eq!(EmptyState::classify(1, 1, "zzz"), None);
    }

    #[test]
    fn test_organizations_search_and_sort() {
        let orgs = vec![
            org("zeta-labs", Some("Acme Research"), None),
            org("acme", None, Some("Widgets and gadgets")),
            org("middle", Some("Beta Org"), None),
        ];

        let logins: Vec<_> = filter_and_sort(&orgs, "", SortOption::Oldest)
            .into_iter()
            .map(|o| o.login)
            .collect();
        assert_eq!(logins, vec!["acme", "middle", "zeta-labs"]);
        let newest: Vec<_> = filter_and_sort(&orgs, "", SortOption::Newest)
            .into_iter()
            .map(|o| o.login)
            .collect();
        assert_eq!(newest, logins);

        let by_name: Vec<_> = filter_and_sort(&orgs, "", SortOption::Az)
            .into_iter()
            .map(|o| o.login)
            .collect();
        assert_eq!(by_name, vec!["acme", "zeta-labs", "middle"]);

        assert_eq!(filter_and_sort(&orgs, "gadget", SortOption::Az).len(), 1);
        assert_eq!(filter_and_sort(&orgs, "acme", SortOption::Az).len(), 2);
    }
}
