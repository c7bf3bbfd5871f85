//! Achievement badges

use std::collections::BTreeSet;

use crate::leaderboard::types::{Badge, Metrics};

pub const WEEK_WARRIOR_STREAK: u32 = 7;
pub const COMMIT_CADENCE_COMMITS: u32 = 5;

/// Every badge whose threshold `metrics` meets. Rules are independent.
#[must_use]
pub fn evaluate_badges(metrics: &Metrics) -> BTreeSet<Badge> {
    let mut badges = BTreeSet::new();
    if metrics.streak >= WEEK_WARRIOR_STREAK {
        badges.insert(Badge::WeekWarrior);
    }
    if metrics.pr_opened_7d >= 1 {
        badges.insert(Badge::PrStarter);
    }
    if metrics.pr_merged_7d >= 1 {
        badges.insert(Badge::MergeMaster);
    }
    if metrics.commits_7d >= COMMIT_CADENCE_COMMITS {
        badges.insert(Badge::CommitCadence);
    }
    badges
}
