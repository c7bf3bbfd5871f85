//! Bounded fan-out, determinism and cancellation.

use super::common::{FakeRepo, ScriptedSource, config, days_ago, now};
use kodegen_tools_leaderboard::{Leaderboard, RosterEntry};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn roster(count: usize) -> Vec<RosterEntry> {
    (0..count)
        .map(|i| RosterEntry::new(format!("Student {i}"), format!("user{i}/proj")))
        .collect()
}

/// Every student gets a different delay; `reverse` flips which ones are slow.
fn staggered_source(count: usize, reverse: bool) -> ScriptedSource {
    (0..count).fold(ScriptedSource::new(), |source, i| {
        let step = if reverse { count - i } else { i + 1 };
        let commits = (0..(i % 4) as i64).map(days_ago);
        source.repo(
            &format!("user{i}/proj"),
            FakeRepo::default()
                .with_commits(commits)
                .with_prs((i % 3) as u64, (i % 2) as u64)
                .slow_everywhere(Duration::from_millis(10 * step as u64)),
        )
    })
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_requests_never_exceed_limit() {
    let engine = Leaderboard::with_source(
        staggered_source(12, false),
        config().with_concurrency(3).with_max_in_flight(2),
    );

    let report = engine.run(&roster(12), now()).await;

    assert_eq!(report.snapshot.students.len(), 12);
    assert!(engine.source().peak_in_flight() <= 2);
    assert!(engine.source().peak_in_flight() >= 1);
}

#[tokio::test(start_paused = true)]
async fn test_output_independent_of_completion_order() {
    let first = Leaderboard::with_source(staggered_source(9, false), config())
        .run(&roster(9), now())
        .await;
    let second = Leaderboard::with_source(staggered_source(9, true), config().with_concurrency(2))
        .run(&roster(9), now())
        .await;

    assert_eq!(first.snapshot, second.snapshot);
    assert_eq!(
        first.snapshot.to_json().unwrap(),
        second.snapshot.to_json().unwrap()
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_start_yields_nothing() {
    let engine = Leaderboard::with_source(staggered_source(3, false), config());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = engine.run_with_cancel(&roster(3), now(), &cancel).await;

    assert!(report.cancelled);
    assert!(report.is_empty());
    assert!(report.snapshot.skipped.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_excludes_in_flight_students() {
    let source = ScriptedSource::new()
        .repo("fast/app", FakeRepo::default().with_commits([days_ago(0)]))
        .repo("hid/app", FakeRepo::hidden())
        .repo(
            "slow/app",
            FakeRepo::default().slow_everywhere(Duration::from_secs(10)),
        );
    let engine = Leaderboard::with_source(source, config().with_timeout(Duration::from_secs(30)));
    let roster = [
        RosterEntry::new("Fast", "fast/app"),
        RosterEntry::new("Hidden", "hid/app"),
        RosterEntry::new("Slow", "slow/app"),
    ];

    let cancel = CancellationToken::new();
    let trigger = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
    };
    let (report, ()) = tokio::join!(engine.run_with_cancel(&roster, now(), &cancel), trigger);

    assert!(report.cancelled);
    let students: Vec<&str> = report.snapshot.students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(students, vec!["Fast"]);
    let skipped: Vec<&str> = report.snapshot.skipped.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(skipped, vec!["Hidden"]);
    assert_eq!(report.snapshot.leaderboard.len(), 1);
}
