//! GitHub REST API models and data structures.
//!
//! Contains the domain types shown in the dashboard and the wire types they are
//! converted from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// Still open
    Open,
    /// Merged into its base branch
    Merged,
    /// Closed without merging
    Closed,
}

impl PrState {
    /// Display label for the state column.
    pub fn label(self) -> &'static str {
        match self {
            PrState::Open => "Open",
            PrState::Merged => "Merged",
            PrState::Closed => "Closed",
        }
    }
}

/// Lifecycle state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueState {
    /// Still open
    Open,
    /// Closed
    Closed,
}

impl IssueState {
    /// Display label for the state column.
    pub fn label(self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

/// A pull request authored by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequest {
    /// Pull request title
    pub title: String,
    /// Repository name (without owner)
    pub repository: String,
    /// Pull request number
    pub number: u64,
    /// Web URL
    pub url: String,
    /// Current state
    pub state: PrState,
    /// Creation time, `None` when the API value could not be parsed
    pub created_at: Option<DateTime<Utc>>,
    /// Merge time for merged PRs, close time for closed ones
    pub closed_at: Option<DateTime<Utc>>,
    /// Formatted creation date
    pub created: String,
    /// Formatted last update date
    pub updated: String,
    /// Whole days between creation and close (or now)
    pub days_open: i64,
    /// Label names joined with ", "
    pub labels: String,
}

/// An issue authored by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    /// Issue title
    pub title: String,
    /// Repository name (without owner)
    pub repository: String,
    /// Issue number
    pub number: u64,
    /// Web URL
    pub url: String,
    /// Current state
    pub state: IssueState,
    /// Creation time, `None` when the API value could not be parsed
    pub created_at: Option<DateTime<Utc>>,
    /// Close time
    pub closed_at: Option<DateTime<Utc>>,
    /// Formatted creation date
    pub created: String,
    /// Formatted last update date
    pub updated: String,
    /// Whole days between creation and close (or now)
    pub days_open: i64,
    /// Label names joined with ", "
    pub labels: String,
}

/// A repository owned by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub stars: u64,
    pub forks: u64,
    pub is_private: bool,
    pub is_fork: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub url: String,
}

impl Repository {
    /// Format star count with K/M suffixes.
    pub fn format_stars(&self) -> String {
        format_count(self.stars)
    }

    /// Format the last update date.
    pub fn format_updated(&self) -> String {
        format_date(self.updated_at)
    }
}

/// A repository the user starred.
///
/// Same shape as [`Repository`]; kept as a separate type because its default
/// ordering is by star count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct StarredRepository(pub Repository);

impl Deref for StarredRepository {
    type Target = Repository;

    fn deref(&self) -> &Repository {
        &self.0
    }
}

/// An organization the user belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub url: String,
    pub description: Option<String>,
}

impl Organization {
    /// Organization name, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// Everything fetched for one user in one refresh cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivitySnapshot {
    /// Login the snapshot belongs to
    pub login: String,
    pub pull_requests: Vec<PullRequest>,
    pub issues: Vec<Issue>,
    pub repositories: Vec<Repository>,
    pub organizations: Vec<Organization>,
    pub starred: Vec<StarredRepository>,
}

/// Format a date as "Jan 15, 2024", or "-" when missing.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format a count with K/M suffixes.
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Parse an RFC 3339 timestamp, yielding `None` for missing or malformed input.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!("Ignoring malformed timestamp {:?}: {}", raw, e);
            None
        }
    }
}

fn days_between(start: Option<DateTime<Utc>>, end: DateTime<Utc>) -> i64 {
    start.map(|s| (end - s).num_days().max(0)).unwrap_or(0)
}

/// `/user` response.
#[derive(Debug, Deserialize)]
pub struct ApiUser {
    pub login: String,
}

/// `/search/issues` response wrapper.
#[derive(Debug, Deserialize)]
pub struct ApiSearchResponse<T> {
    /// Total matches reported by the API (may exceed `items.len()`)
    #[serde(default)]
    pub total_count: u64,
    pub items: Vec<T>,
}

/// Issue or pull request item from `/search/issues`.
#[derive(Debug, Deserialize)]
pub struct ApiIssueItem {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: String,
    pub repository_url: String,
    #[serde(default)]
    pub labels: Vec<ApiLabel>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
    /// Present only when the item is a pull request
    pub pull_request: Option<ApiPullRequestRef>,
}

/// Label attached to an issue or pull request.
#[derive(Debug, Deserialize)]
pub struct ApiLabel {
    pub name: String,
}

/// Pull request marker on a search item.
#[derive(Debug, Deserialize)]
pub struct ApiPullRequestRef {
    pub merged_at: Option<String>,
}

/// Repository item from `/user/repos` and `/user/starred`.
#[derive(Debug, Deserialize)]
pub struct ApiRepository {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Organization item from `/user/orgs`.
#[derive(Debug, Deserialize)]
pub struct ApiOrganization {
    pub login: String,
    /// Only returned by the single-organization endpoint
    pub name: Option<String>,
    pub avatar_url: String,
    pub description: Option<String>,
}

impl ApiIssueItem {
    fn repository_name(&self) -> String {
        self.repository_url
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    fn joined_labels(&self) -> String {
        self.labels
            .iter()
            .map(|label| label.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether this search item is a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Convert into a pull request.
    ///
    /// # Arguments
    /// * `now` - Reference time for `days_open` of still-open items
    pub fn into_pull_request(self, now: DateTime<Utc>) -> PullRequest {
        let merged_at = self
            .pull_request
            .as_ref()
            .and_then(|pr| parse_timestamp(pr.merged_at.as_deref()));
        let state = if merged_at.is_some() {
            PrState::Merged
        } else if self.state.eq_ignore_ascii_case("closed") {
            PrState::Closed
        } else {
            PrState::Open
        };
        let created_at = parse_timestamp(self.created_at.as_deref());
        let closed_at = merged_at.or_else(|| parse_timestamp(self.closed_at.as_deref()));
        let updated_at = parse_timestamp(self.updated_at.as_deref());

        PullRequest {
            repository: self.repository_name(),
            labels: self.joined_labels(),
            title: self.title,
            number: self.number,
            url: self.html_url,
            state,
            created_at,
            closed_at,
            created: format_date(created_at),
            updated: format_date(updated_at),
            days_open: days_between(created_at, closed_at.unwrap_or(now)),
        }
    }

    /// Convert into an issue.
    ///
    /// # Arguments
    /// * `now` - Reference time for `days_open` of still-open items
    pub fn into_issue(self, now: DateTime<Utc>) -> Issue {
        let state = if self.state.eq_ignore_ascii_case("closed") {
            IssueState::Closed
        } else {
            IssueState::Open
        };
        let created_at = parse_timestamp(self.created_at.as_deref());
        let closed_at = parse_timestamp(self.closed_at.as_deref());
        let updated_at = parse_timestamp(self.updated_at.as_deref());

        Issue {
            repository: self.repository_name(),
            labels: self.joined_labels(),
            title: self.title,
            number: self.number,
            url: self.html_url,
            state,
            created_at,
            closed_at,
            created: format_date(created_at),
            updated: format_date(updated_at),
            days_open: days_between(created_at, closed_at.unwrap_or(now)),
        }
    }
}

impl From<ApiRepository> for Repository {
    fn from(item: ApiRepository) -> Self {
        Repository {
            name: item.name,
            description: item.description,
            language: item.language,
            topics: item.topics,
            stars: item.stargazers_count,
            forks: item.forks_count,
            is_private: item.private,
            is_fork: item.fork,
            created_at: parse_timestamp(item.created_at.as_deref()),
            updated_at: parse_timestamp(item.updated_at.as_deref()),
            url: item.html_url,
        }
    }
}

impl From<ApiOrganization> for Organization {
    fn from(item: ApiOrganization) -> Self {
        Organization {
            url: format!("https://github.com/{}", item.login),
            login: item.login,
            name: item.name.filter(|name| !name.is_empty()),
            avatar_url: item.avatar_url,
            description: item.description.filter(|d| !d.is_empty()),
        }
    }
}
