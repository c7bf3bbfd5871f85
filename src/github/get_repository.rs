//! GitHub repository visibility probe.

use crate::github::{error::GitHubError, util::spawn_task};
use crate::runtime::AsyncTask;
use octocrab::Octocrab;
use std::sync::Arc;

/// Check whether the authenticated credentials can view a repository.
///
/// A missing repository and a hidden one look the same to the caller:
/// both resolve to `Ok(false)`. Every other failure is returned as-is.
pub(crate) fn repo_visible(
    inner: Arc<Octocrab>,
    owner: impl Into<String>,
    repo: impl Into<String>,
) -> AsyncTask<Result<bool, GitHubError>> {
    let owner = owner.into();
    let repo = repo.into();

    spawn_task(async move {
        match inner.repos(&owner, &repo).get().await.map_err(GitHubError::from) {
            Ok(found) => Ok(!found.name.is_empty()),
            Err(e) if e.is_access_denied() => Ok(false),
            Err(e) => Err(e),
        }
    })
}
