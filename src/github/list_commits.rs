//! GitHub repository commits listing operation.

use crate::github::{error::GitHubError, util::spawn_task};
use crate::runtime::AsyncTask;
use octocrab::{Octocrab, models::repos::RepoCommit};
use std::sync::Arc;

/// Options for listing commits in a repository.
#[derive(Debug, Clone, Default)]
pub struct ListCommitsOptions {
    /// GitHub login or email address to filter commits by author.
    pub author: Option<String>,
    /// Only show commits after this date (ISO 8601 format).
    pub since: Option<String>,
    /// Only show commits before this date (ISO 8601 format).
    pub until: Option<String>,
    /// Number of results per page (max 100).
    pub per_page: Option<u8>,
    /// Stop following `next` links after this many pages. `None` reads one page.
    pub max_pages: Option<u32>,
}

/// List commits in a repository, following pagination up to `max_pages`.
///
/// Results past the page cap are silently truncated.
pub(crate) fn list_commits(
    inner: Arc<Octocrab>,
    owner: impl Into<String>,
    repo: impl Into<String>,
    options: ListCommitsOptions,
) -> AsyncTask<Result<Vec<RepoCommit>, GitHubError>> {
    let owner = owner.into();
    let repo = repo.into();

    spawn_task(async move {
        let repos_handler = inner.repos(&owner, &repo);
        let mut request = repos_handler.list_commits();

        if let Some(author_val) = options.author {
            request = request.author(author_val);
        }

        if let Some(since_val) = options.since {
            let dt = chrono::DateTime::parse_from_rfc3339(&since_val).map_err(|e| {
                GitHubError::InvalidInput(format!("Invalid since date '{since_val}': {e}"))
            })?;
            request = request.since(dt.with_timezone(&chrono::Utc));
        }

        if let Some(until_val) = options.until {
            let dt = chrono::DateTime::parse_from_rfc3339(&until_val).map_err(|e| {
                GitHubError::InvalidInput(format!("Invalid until date '{until_val}': {e}"))
            })?;
            request = request.until(dt.with_timezone(&chrono::Utc));
        }

        request = request.per_page(options.per_page.unwrap_or(100));

        let mut page = request.send().await.map_err(GitHubError::from)?;
        let mut commits = std::mem::take(&mut page.items);
        let mut pages_read = 1;

        while pages_read < options.max_pages.unwrap_or(1) {
            match inner.get_page::<RepoCommit>(&page.next).await? {
                Some(mut next_page) => {
                    commits.append(&mut next_page.items);
                    page = next_page;
                    pages_read += 1;
                }
                None => break,
            }
        }

        Ok(commits)
    })
}
