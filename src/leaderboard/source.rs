//! External activity source seam

use chrono::{DateTime, SecondsFormat, Utc};
use std::future::Future;

use crate::github::{GitHubClient, GitHubResult, ListCommitsOptions};
use crate::leaderboard::types::CommitEvent;

/// The three external queries the engine depends on.
///
/// [`GitHubClient`] is the production implementation; tests script their own.
pub trait ActivitySource: Send + Sync {
    /// `Ok(false)` when the repository is missing or hidden.
    fn repo_visible(&self, owner: &str, repo: &str)
    -> impl Future<Output = GitHubResult<bool>> + Send;

    /// Commits authored since `since`, possibly truncated by pagination caps.
    fn commits_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
        author: Option<&str>,
    ) -> impl Future<Output = GitHubResult<Vec<CommitEvent>>> + Send;

    /// `total_count` of an issue/PR search.
    fn count_issues(&self, query: &str) -> impl Future<Output = GitHubResult<u64>> + Send;
}

/// `ActivitySource` over the GitHub REST API.
#[derive(Clone, Debug)]
pub struct GitHubActivitySource {
    client: GitHubClient,
    page_size: u8,
    max_pages: u32,
}

impl GitHubActivitySource {
    #[must_use]
    pub fn new(client: GitHubClient, page_size: u8, max_pages: u32) -> Self {
        Self {
            client,
            page_size: page_size.clamp(1, 100),
            max_pages: max_pages.max(1),
        }
    }
}

impl ActivitySource for GitHubActivitySource {
    async fn repo_visible(&self, owner: &str, repo: &str) -> GitHubResult<bool> {
        self.client.repo_visible(owner, repo).await?
    }

    async fn commits_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
        author: Option<&str>,
    ) -> GitHubResult<Vec<CommitEvent>> {
        let options = ListCommitsOptions {
            author: author.map(str::to_string),
            since: Some(since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            until: None,
            per_page: Some(self.page_size),
            max_pages: Some(self.max_pages),
        };
        let commits = self.client.list_commits(owner, repo, options).await??;

        // Commits without an author date cannot be placed on a day.
        Ok(commits
            .iter()
            .filter_map(|c| c.commit.author.as_ref().and_then(|a| a.date))
            .map(CommitEvent::from_instant)
            .collect())
    }

    async fn count_issues(&self, query: &str) -> GitHubResult<u64> {
        self.client.search_issues_count(query).await?
    }
}
