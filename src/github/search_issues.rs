//! GitHub Issues search operation.

use crate::github::{error::GitHubError, util::spawn_task};
use crate::runtime::AsyncTask;
use octocrab::{Octocrab, Page, models::issues::Issue};
use std::sync::Arc;

/// Total number of issues/PRs matching a search query.
///
/// Only the `total_count` of the first page is read, so a single item is
/// requested.
pub(crate) fn search_issues_count(
    inner: Arc<Octocrab>,
    query: impl Into<String>,
) -> AsyncTask<Result<u64, GitHubError>> {
    let q = query.into();

    spawn_task(async move {
        let page: Page<Issue> = inner
            .search()
            .issues_and_pull_requests(&q)
            .per_page(1)
            .send()
            .await
            .map_err(GitHubError::from)?;

        Ok(page.total_count.unwrap_or(0))
    })
}
