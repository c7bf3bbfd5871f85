//! GitHub API operations module
//!
//! Provides the read-only GitHub API operations the leaderboard relies on,
//! using the octocrab library.

pub mod client;
pub mod error;
pub mod util;

// Re-export client types
pub use client::{GitHubClient, GitHubClientBuilder};

// Re-export error types
pub use error::{GitHubError, GitHubResult};
pub use util::spawn_task;

// Re-export options types
pub use list_commits::ListCommitsOptions;

// GitHub API operations (internal)
pub(crate) mod get_repository;
pub(crate) mod list_commits;
pub(crate) mod search_issues;
