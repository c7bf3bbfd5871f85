//! Ranking: total order and dense rank by score

use std::cmp::Ordering;

use crate::leaderboard::types::{LeaderboardEntry, StudentRecord};

/// Score descending, then streak descending, then name ascending
/// ignoring case.
#[must_use]
pub fn compare_students(a: &StudentRecord, b: &StudentRecord) -> Ordering {
    b.metrics
        .score
        .cmp(&a.metrics.score)
        .then_with(|| b.metrics.streak.cmp(&a.metrics.streak))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

/// Sort `students` in place (stable, so full ties keep roster order) and
/// project the leaderboard.
///
/// Rank is dense over score only: a new score takes its 1-based position,
/// an equal score keeps the previous rank even when the streak tie-break
/// separated the two.
pub fn rank_students(students: &mut [StudentRecord]) -> Vec<LeaderboardEntry> {
    students.sort_by(compare_students);

    let mut leaderboard: Vec<LeaderboardEntry> = Vec::with_capacity(students.len());
    let mut rank = 0u32;
    let mut last_score = None;

    for student in students.iter() {
        let score = student.metrics.score;
        if last_score != Some(score) {
            rank = u32::try_from(leaderboard.len() + 1).unwrap_or(u32::MAX);
            last_score = Some(score);
        }
        leaderboard.push(LeaderboardEntry {
            name: student.name.clone(),
            repo: student.repo.clone(),
            score,
            rank,
        });
    }

    leaderboard
}
