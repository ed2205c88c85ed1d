//! Errors returned by the GitHub client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub token is required. Set github_token in config.jsonc or GITHUB_TOKEN")]
    MissingToken,

    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GitHub API error ({status}) on {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}
