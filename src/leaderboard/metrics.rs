//! Metric reduction: counts, distinct days, streak and score

use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

use crate::leaderboard::types::{Activity, CommitEvent, Metrics};

pub const COMMIT_WEIGHT: u64 = 1;
pub const COMMIT_DAY_WEIGHT: u64 = 2;
pub const PR_OPENED_WEIGHT: u64 = 3;
pub const PR_MERGED_WEIGHT: u64 = 5;

/// Distinct UTC calendar days present in a commit list.
#[must_use]
pub fn distinct_days(commits: &[CommitEvent]) -> BTreeSet<NaiveDate> {
    commits.iter().map(|c| c.author_date).collect()
}

/// Consecutive active days ending on `today`.
///
/// Zero when `today` itself has no activity; a single missing day ends
/// the run.
#[must_use]
pub fn streak(active_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = today;
    while active_days.contains(&day) {
        count += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}

#[must_use]
pub fn weighted_score(commits: u32, commit_days: u32, prs_opened: u32, prs_merged: u32) -> u64 {
    u64::from(commits) * COMMIT_WEIGHT
        + u64::from(commit_days) * COMMIT_DAY_WEIGHT
        + u64::from(prs_opened) * PR_OPENED_WEIGHT
        + u64::from(prs_merged) * PR_MERGED_WEIGHT
}

/// Reduce raw activity to [`Metrics`]. The streak is taken over the long
/// window's distinct days.
#[must_use]
pub fn compute_metrics(activity: &Activity, today: NaiveDate) -> Metrics {
    let commits_7d = count(activity.commits_window.len());
    let commit_days_7d = count(distinct_days(&activity.commits_window).len());
    let long_days = distinct_days(&activity.commits_30d);

    Metrics {
        commits_7d,
        commit_days_7d,
        commits_30d: count(activity.commits_30d.len()),
        pr_opened_7d: activity.prs_opened,
        pr_merged_7d: activity.prs_merged,
        streak: streak(&long_days, today),
        score: weighted_score(
            commits_7d,
            commit_days_7d,
            activity.prs_opened,
            activity.prs_merged,
        ),
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
