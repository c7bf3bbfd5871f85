//! GitHub API client wrapper
//!
//! Provides clean API for the read-only GitHub operations the leaderboard
//! needs, without exposing Octocrab.
//!
//! # Examples
//!
//! ```rust,no_run
//! use kodegen_tools_leaderboard::GitHubClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gh = GitHubClient::with_token("ghp_...")?;
//!
//!     if gh.repo_visible("owner", "repo").await?? {
//!         let merged = gh
//!             .search_issues_count("repo:owner/repo is:pr is:merged")
//!             .await??;
//!         println!("{merged} merged pull requests");
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::github::error::{GitHubError, GitHubResult};
use crate::github::list_commits::ListCommitsOptions;
use crate::runtime::AsyncTask;
use octocrab::Octocrab;
use std::sync::Arc;

/// GitHub API client wrapper that encapsulates Octocrab.
///
/// Cloning is cheap (Arc clone).
#[derive(Clone, Debug)]
pub struct GitHubClient {
    inner: Arc<Octocrab>,
}

impl GitHubClient {
    /// Create a new client builder
    #[must_use]
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::new()
    }

    /// Convenience: create client with personal access token
    pub fn with_token(token: impl Into<String>) -> GitHubResult<Self> {
        Self::builder().personal_token(token).build()
    }

    /// Get inner Octocrab client
    #[must_use]
    pub fn inner(&self) -> &Arc<Octocrab> {
        &self.inner
    }

    /// Whether the current credentials can view `owner/repo`
    pub fn repo_visible(
        &self,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> AsyncTask<Result<bool, GitHubError>> {
        crate::github::get_repository::repo_visible(self.inner.clone(), owner, repo)
    }

    /// List commits
    pub fn list_commits(
        &self,
        owner: impl Into<String>,
        repo: impl Into<String>,
        options: ListCommitsOptions,
    ) -> AsyncTask<Result<Vec<octocrab::models::repos::RepoCommit>, GitHubError>> {
        crate::github::list_commits::list_commits(self.inner.clone(), owner, repo, options)
    }

    /// Count issues and pull requests matching a search query
    pub fn search_issues_count(
        &self,
        query: impl Into<String>,
    ) -> AsyncTask<Result<u64, GitHubError>> {
        crate::github::search_issues::search_issues_count(self.inner.clone(), query)
    }
}

/// Builder for creating `GitHubClient`
pub struct GitHubClientBuilder {
    token: Option<String>,
    base_uri: Option<String>,
}

impl GitHubClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            base_uri: None,
        }
    }

    /// Set personal access token for authentication
    pub fn personal_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set base URI (for GitHub Enterprise)
    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    /// Build the `GitHubClient`
    pub fn build(self) -> GitHubResult<GitHubClient> {
        let mut builder = Octocrab::builder();

        match self.token {
            Some(token) if !token.trim().is_empty() => {
                builder = builder.personal_token(token);
            }
            _ => return Err(GitHubError::AuthRequired),
        }

        if let Some(uri) = self.base_uri {
            builder = builder
                .base_uri(&uri)
                .map_err(|e| GitHubError::ClientSetup(e.to_string()))?;
        }

        let octocrab = builder
            .build()
            .map_err(|e| GitHubError::ClientSetup(e.to_string()))?;

        Ok(GitHubClient {
            inner: Arc::new(octocrab),
        })
    }
}

impl Default for GitHubClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
