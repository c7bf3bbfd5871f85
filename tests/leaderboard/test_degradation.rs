//! Partial failures: degraded queries, failed access checks, rate limits.

use super::common::{Call, FakeRepo, ScriptedSource, config, days_ago, now};
use kodegen_tools_leaderboard::{
    DiagnosticLevel, Leaderboard, QueryKind, RosterEntry, SkipReason,
};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_failed_merged_search_degrades_to_zero() {
    let source = ScriptedSource::new()
        .repo(
            "mia/app",
            FakeRepo::default()
                .with_commits([days_ago(0)])
                .with_prs(1, 4)
                .failing(Call::Merged, 502),
        )
        .repo("ned/app", FakeRepo::default().with_prs(0, 1));
    let engine = Leaderboard::with_source(source, config());

    let roster = [RosterEntry::new("Mia", "mia/app"), RosterEntry::new("Ned", "ned/app")];
    let report = engine.run(&roster, now()).await;

    let mia = report.snapshot.students.iter().find(|s| s.name == "Mia").unwrap();
    assert_eq!(mia.metrics.pr_merged_7d, 0);
    assert_eq!(mia.metrics.pr_opened_7d, 1);
    assert_eq!(mia.metrics.score, 1 + 2 + 3);

    let ned = report.snapshot.students.iter().find(|s| s.name == "Ned").unwrap();
    assert_eq!(ned.metrics.pr_merged_7d, 1);

    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.level, DiagnosticLevel::Warning);
    assert_eq!(diagnostic.query, QueryKind::PrsMerged);
    assert_eq!(diagnostic.student.as_deref(), Some("Mia"));
    assert_eq!(diagnostic.repo.as_deref(), Some("mia/app"));
    assert_eq!(report.errors().count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_access_transport_failure_is_skipped_with_error() {
    let source = ScriptedSource::new()
        .repo(
            "oli/app",
            FakeRepo {
                visible: Err(500),
                ..FakeRepo::default()
            },
        )
        .repo("pat/app", FakeRepo::default());
    let engine = Leaderboard::with_source(source, config());

    let roster = [RosterEntry::new("Oli", "oli/app"), RosterEntry::new("Pat", "pat/app")];
    let report = engine.run(&roster, now()).await;

    assert_eq!(report.snapshot.skipped.len(), 1);
    assert_eq!(report.snapshot.skipped[0].reason, SkipReason::AccessCheckFailed);
    assert_eq!(report.snapshot.students.len(), 1);
    assert_eq!(report.snapshot.students[0].name, "Pat");

    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].query, QueryKind::Access);
    assert_eq!(errors[0].repo.as_deref(), Some("oli/app"));
}

#[tokio::test(start_paused = true)]
async fn test_forbidden_repo_counts_as_no_access() {
    let source = ScriptedSource::new().repo(
        "quin/app",
        FakeRepo {
            visible: Err(403),
            ..FakeRepo::default()
        },
    );
    let engine = Leaderboard::with_source(source, config());

    let report = engine.run(&[RosterEntry::new("Quin", "quin/app")], now()).await;

    assert_eq!(report.snapshot.skipped[0].reason, SkipReason::NoAccessOrMissing);
    assert!(report.diagnostics.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_backs_off_and_recovers() {
    let source = ScriptedSource::new()
        .repo("rex/app", FakeRepo::default().with_commits([days_ago(0)]))
        .rate_limited_for(2);
    let engine = Leaderboard::with_source(source, config());

    let report = engine.run(&[RosterEntry::new("Rex", "rex/app")], now()).await;

    assert_eq!(report.rate_limit_hits, 2);
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.snapshot.students[0].metrics.commits_7d, 1);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_beyond_retries_skips_with_error() {
    // Three limited responses exhaust the two retries of the access check.
    let source = ScriptedSource::new()
        .repo("sue/app", FakeRepo::default())
        .rate_limited_for(3);
    let engine = Leaderboard::with_source(source, config());

    let report = engine.run(&[RosterEntry::new("Sue", "sue/app")], now()).await;

    assert_eq!(report.snapshot.skipped[0].reason, SkipReason::AccessCheckFailed);
    assert_eq!(report.errors().count(), 1);
    assert_eq!(report.rate_limit_hits, 3);
}

#[tokio::test(start_paused = true)]
async fn test_slow_commit_query_times_out_and_degrades() {
    let source = ScriptedSource::new().repo(
        "tia/app",
        FakeRepo::default()
            .with_commits([days_ago(0)])
            .with_prs(1, 0)
            .slow(Call::Commits, Duration::from_secs(60)),
    );
    let engine = Leaderboard::with_source(source, config());

    let report = engine.run(&[RosterEntry::new("Tia", "tia/app")], now()).await;

    let tia = &report.snapshot.students[0];
    assert_eq!(tia.metrics.commits_7d, 0);
    assert_eq!(tia.metrics.commits_30d, 0);
    assert_eq!(tia.metrics.pr_opened_7d, 1);
    assert!(report.snapshot.skipped.is_empty());

    let queries: HashSet<QueryKind> = report.warnings().map(|d| d.query).collect();
    assert_eq!(queries, HashSet::from([QueryKind::CommitsWindow, QueryKind::Commits30d]));
    assert!(report.warnings().all(|d| d.message.contains("timed out")));
}

#[tokio::test(start_paused = true)]
async fn test_missing_subdomain_file_is_a_warning() {
    let source = ScriptedSource::new().repo("uma/app", FakeRepo::default());
    let engine = Leaderboard::with_source(source, config())
        .with_subdomains_file(Path::new("/definitely/not/here/subdomains.json"));

    let roster = [RosterEntry::new("Uma", "uma/app").with_app_url("https://uma.bolt.host")];
    let report = engine.run(&roster, now()).await;

    assert_eq!(report.snapshot.students.len(), 1);
    let urls = &report.snapshot.students[0].urls;
    assert_eq!(urls.app_url.as_deref(), Some("https://uma.bolt.host"));
    assert_eq!(urls.public_url, None);

    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].query, QueryKind::Subdomains);
    assert_eq!(warnings[0].student, None);
}
