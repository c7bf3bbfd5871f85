//! Activity fetching for a single repository

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::debug;

use crate::github::{GitHubError, GitHubResult};
use crate::leaderboard::rate_limiter::RateGate;
use crate::leaderboard::source::ActivitySource;
use crate::leaderboard::types::{Activity, QueryKind, RepoId};

/// The instants both windows are anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchWindows {
    pub now: DateTime<Utc>,
    pub window_since: DateTime<Utc>,
    pub long_since: DateTime<Utc>,
}

impl FetchWindows {
    #[must_use]
    pub fn new(now: DateTime<Utc>, window_days: u32, long_window_days: u32) -> Self {
        Self {
            now,
            window_since: now - Duration::days(i64::from(window_days)),
            long_since: now - Duration::days(i64::from(long_window_days)),
        }
    }

    /// Calendar day the short window starts on, used by the PR searches.
    #[must_use]
    pub fn window_start_date(&self) -> NaiveDate {
        self.window_since.date_naive()
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

/// A query that degraded to an empty result.
#[derive(Debug)]
pub struct QueryFailure {
    pub query: QueryKind,
    pub error: GitHubError,
}

/// Search query for pull requests opened by `author` since `since`.
#[must_use]
pub fn prs_opened_query(repo: &RepoId, author: &str, since: NaiveDate) -> String {
    format!(
        "repo:{}/{} is:pr author:{author} created:>={}",
        repo.owner,
        repo.repo,
        since.format("%Y-%m-%d")
    )
}

/// Search query for pull requests by `author` merged since `since`.
#[must_use]
pub fn prs_merged_query(repo: &RepoId, author: &str, since: NaiveDate) -> String {
    format!(
        "repo:{}/{} is:pr author:{author} is:merged merged:>={}",
        repo.owner,
        repo.repo,
        since.format("%Y-%m-%d")
    )
}

/// Fetch commits for both windows and the two pull-request counts.
///
/// The four queries run concurrently. Each one that fails contributes an
/// empty result and a [`QueryFailure`]; the others are unaffected.
///
/// Commits are not filtered by author since many carry no GitHub login.
/// Pull requests are attributed to the repository owner.
pub async fn fetch_activity<S: ActivitySource>(
    source: &S,
    gate: &RateGate,
    repo: &RepoId,
    windows: &FetchWindows,
) -> (Activity, Vec<QueryFailure>) {
    let author = repo.owner.as_str();
    let since_date = windows.window_start_date();
    let opened_q = prs_opened_query(repo, author, since_date);
    let merged_q = prs_merged_query(repo, author, since_date);

    let (window, long, opened, merged) = tokio::join!(
        gate.call("list_commits", || source.commits_since(
            &repo.owner,
            &repo.repo,
            windows.window_since,
            None
        )),
        gate.call("list_commits", || source.commits_since(
            &repo.owner,
            &repo.repo,
            windows.long_since,
            None
        )),
        gate.call("search_issues", || source.count_issues(&opened_q)),
        gate.call("search_issues", || source.count_issues(&merged_q)),
    );

    let mut failures = Vec::new();
    let activity = Activity {
        commits_window: or_empty(window, QueryKind::CommitsWindow, &mut failures),
        commits_30d: or_empty(long, QueryKind::Commits30d, &mut failures),
        prs_opened: clamp_count(or_empty(opened, QueryKind::PrsOpened, &mut failures)),
        prs_merged: clamp_count(or_empty(merged, QueryKind::PrsMerged, &mut failures)),
    };

    debug!(
        "{repo}: {} commits in window, {} in long window, {} PRs opened, {} merged",
        activity.commits_window.len(),
        activity.commits_30d.len(),
        activity.prs_opened,
        activity.prs_merged
    );

    (activity, failures)
}

fn or_empty<T: Default>(
    result: GitHubResult<T>,
    query: QueryKind,
    failures: &mut Vec<QueryFailure>,
) -> T {
    result.unwrap_or_else(|error| {
        failures.push(QueryFailure { query, error });
        T::default()
    })
}

fn clamp_count(count: u64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
