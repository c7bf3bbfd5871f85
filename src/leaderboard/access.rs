//! Repository access gate

use log::debug;

use crate::github::GitHubResult;
use crate::leaderboard::rate_limiter::RateGate;
use crate::leaderboard::source::ActivitySource;
use crate::leaderboard::types::RepoId;

/// Whether the current credentials can view `repo`.
///
/// Missing and forbidden repositories both come back as `Ok(false)`.
/// Transport failures (timeouts, 5xx, bad credentials, exhausted rate-limit
/// retries) are returned so the caller can record them.
pub async fn can_view<S: ActivitySource>(
    source: &S,
    gate: &RateGate,
    repo: &RepoId,
) -> GitHubResult<bool> {
    let visible = match gate
        .call("repo_visible", || source.repo_visible(&repo.owner, &repo.repo))
        .await
    {
        Ok(visible) => visible,
        Err(e) if e.is_access_denied() => false,
        Err(e) => return Err(e),
    };
    if !visible {
        debug!("{repo} is private or missing");
    }
    Ok(visible)
}
