//! GitHub REST API integration module.
//!
//! Provides the client used to fetch a user's activity and the models it produces.

pub mod client;
pub mod error;
pub mod models;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use models::{
    ActivitySnapshot, Issue, IssueState, Organization, PrState, PullRequest, Repository,
    StarredRepository,
};
