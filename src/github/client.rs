//! GitHub REST API client implementation.
//!
//! Handles authentication and fetching of the user's activity.

use crate::config::Config;
use crate::github::error::GitHubError;
use crate::github::models::{
    ActivitySnapshot, ApiIssueItem, ApiOrganization, ApiRepository, ApiSearchResponse, ApiUser,
    Issue, Organization, PullRequest, Repository, StarredRepository,
};
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// API version pinned in every request.
const API_VERSION: &str = "2022-11-28";

/// Kind of item requested from the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchKind {
    PullRequests,
    Issues,
}

/// GitHub REST API client.
///
/// Handles API requests for fetching a user's activity.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// HTTP client for API requests
    client: Client,
    /// Personal access token
    token: String,
    /// Base URL for the REST API, without trailing slash
    base_url: String,
    /// Items requested per endpoint
    per_page: u32,
}

impl GitHubClient {
    /// Create a new GitHub client from configuration.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    /// * `token` - Token resolved from config or environment
    ///
    /// # Returns
    /// * `Result<GitHubClient, GitHubError>` - New client or error
    pub fn new(config: &Config, token: Option<String>) -> Result<Self, GitHubError> {
        let token = token.ok_or(GitHubError::MissingToken)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("gh-activity-tui/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| GitHubError::Transport {
                endpoint: "client".to_string(),
                source,
            })?;

        Ok(Self {
            client,
            token,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
        })
    }

    /// Fetch everything the dashboard shows in one pass.
    ///
    /// # Details
    /// Resolves the authenticated login first, then requests the five
    /// collections concurrently. Any failing endpoint fails the whole refresh.
    pub async fn fetch_snapshot(&self) -> Result<ActivitySnapshot, GitHubError> {
        let login = self.fetch_viewer_login().await?;
        tracing::info!("Fetching activity for {}", login);

        let (pull_requests, issues, repositories, organizations, starred) = tokio::try_join!(
            self.fetch_pull_requests(&login),
            self.fetch_issues(&login),
            self.fetch_repositories(),
            self.fetch_organizations(),
            self.fetch_starred(),
        )?;

        tracing::info!(
            "Fetched {} PRs, {} issues, {} repositories, {} organizations, {} starred",
            pull_requests.len(),
            issues.len(),
            repositories.len(),
            organizations.len(),
            starred.len()
        );

        Ok(ActivitySnapshot {
            login,
            pull_requests,
            issues,
            repositories,
            organizations,
            starred,
        })
    }

    /// Fetch the login of the authenticated user.
    pub async fn fetch_viewer_login(&self) -> Result<String, GitHubError> {
        let user: ApiUser = self.get_json("/user", &[]).await?;
        Ok(user.login)
    }

    /// Fetch pull requests authored by `login`, newest first.
    pub async fn fetch_pull_requests(&self, login: &str) -> Result<Vec<PullRequest>, GitHubError> {
        let now = Utc::now();
        let items = self.search(login, SearchKind::PullRequests).await?;
        Ok(items
            .into_iter()
            .filter(ApiIssueItem::is_pull_request)
            .map(|item| item.into_pull_request(now))
            .collect())
    }

    /// Fetch issues authored by `login`, newest first.
    pub async fn fetch_issues(&self, login: &str) -> Result<Vec<Issue>, GitHubError> {
        let now = Utc::now();
        let items = self.search(login, SearchKind::Issues).await?;
        Ok(items
            .into_iter()
            .filter(|item| !item.is_pull_request())
            .map(|item| item.into_issue(now))
            .collect())
    }

    /// Fetch repositories owned by the authenticated user.
    pub async fn fetch_repositories(&self) -> Result<Vec<Repository>, GitHubError> {
        let repos: Vec<ApiRepository> = self
            .get_json(
                "/user/repos",
                &[
                    ("affiliation", "owner".to_string()),
                    ("sort", "updated".to_string()),
                ],
            )
            .await?;
        Ok(repos.into_iter().map(Repository::from).collect())
    }

    /// Fetch organizations the authenticated user belongs to.
    pub async fn fetch_organizations(&self) -> Result<Vec<Organization>, GitHubError> {
        let orgs: Vec<ApiOrganization> = self.get_json("/user/orgs", &[]).await?;
        Ok(orgs.into_iter().map(Organization::from).collect())
    }

    /// Fetch repositories starred by the authenticated user.
    pub async fn fetch_starred(&self) -> Result<Vec<StarredRepository>, GitHubError> {
        let repos: Vec<ApiRepository> = self.get_json("/user/starred", &[]).await?;
        Ok(repos
            .into_iter()
            .map(|repo| StarredRepository(repo.into()))
            .collect())
    }

    async fn search(&self, login: &str, kind: SearchKind) -> Result<Vec<ApiIssueItem>, GitHubError> {
        let response: ApiSearchResponse<ApiIssueItem> = self
            .get_json(
                "/search/issues",
                &[
                    ("q", search_query(login, kind)),
                    ("sort", "created".to_string()),
                    ("order", "desc".to_string()),
                ],
            )
            .await?;

        if response.total_count > response.items.len() as u64 {
            tracing::debug!(
                "Search for {:?} returned {} of {} matches",
                kind,
                response.items.len(),
                response.total_count
            );
        }

        Ok(response.items)
    }

    /// Issue an authenticated GET and decode the JSON body.
    ///
    /// # Details
    /// Appends `per_page` to every request; results beyond the first page are not fetched.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GitHubError> {
        let url = format!("{}{}", self.base_url, path);
        let mut params: Vec<(&str, String)> = query.to_vec();
        params.push(("per_page", self.per_page.to_string()));

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .query(&params)
            .send()
            .await
            .map_err(|source| GitHubError::Transport {
                endpoint: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Status {
                endpoint: path.to_string(),
                status,
                body,
            });
        }

        response.json().await.map_err(|source| GitHubError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }
}

fn search_query(login: &str, kind: SearchKind) -> String {
    let kind = match kind {
        SearchKind::PullRequests => "pr",
        SearchKind::Issues => "issue",
    };
    format!("author:{} type:{}", login, kind)
}
