//! Snapshot and roster files on disk.

use super::common::{FakeRepo, ScriptedSource, config, days_ago, now};
use kodegen_tools_leaderboard::{Leaderboard, RosterEntry, Snapshot, load_roster};
use serde_json::Value;

async fn sample_snapshot() -> Snapshot {
    let source = ScriptedSource::new()
        .repo(
            "vic/app",
            FakeRepo::default().with_commits((0..7).map(days_ago)).with_prs(1, 1),
        )
        .repo("wes/app", FakeRepo::hidden());
    let table = [("vic".to_string(), "vic-app".to_string())].into_iter().collect();
    let engine = Leaderboard::with_source(source, config()).with_subdomains(table);
    let roster = [
        RosterEntry::new("Vic", "vic/app").with_app_url("vic-app.bolt.host"),
        RosterEntry::new("Wes", "wes/app"),
    ];
    engine.run(&roster, now()).await.snapshot
}

#[tokio::test]
async fn test_write_creates_parent_dirs_and_reads_back() {
    let snapshot = sample_snapshot().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("public").join("data").join("leaderboard.json");

    snapshot.write_to(&path).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("}\n"));
    assert_eq!(Snapshot::from_json(&text).unwrap(), snapshot);
}

#[tokio::test(start_paused = true)]
async fn test_document_field_names() {
    let json: Value = serde_json::from_str(&sample_snapshot().await.to_json().unwrap()).unwrap();

    assert_eq!(json["generated_at"], "2025-03-10T15:30:00Z");
    assert_eq!(json["window_days"], 7);

    let vic = &json["students"][0];
    assert_eq!(vic["name"], "Vic");
    assert_eq!(vic["repo"], "vic/app");
    assert_eq!(vic["owner"], "vic");
    assert_eq!(vic["metrics"]["commits_7d"], 7);
    assert_eq!(vic["metrics"]["commit_days_7d"], 7);
    assert_eq!(vic["metrics"]["commits_30d"], 7);
    assert_eq!(vic["metrics"]["pr_opened_7d"], 1);
    assert_eq!(vic["metrics"]["pr_merged_7d"], 1);
    assert_eq!(vic["metrics"]["streak"], 7);
    assert_eq!(vic["metrics"]["score"], 7 + 14 + 3 + 5);
    assert_eq!(
        vic["badges"],
        serde_json::json!(["week-warrior", "pr-starter", "merge-master", "commit-cadence"])
    );
    assert_eq!(vic["urls"]["bolt"], "https://vic-app.bolt.host");
    assert_eq!(vic["urls"]["illinihunt"], "https://vic.illinihunt.org");

    assert_eq!(
        json["leaderboard"][0],
        serde_json::json!({"name": "Vic", "repo": "vic/app", "score": 29, "rank": 1})
    );
    assert_eq!(
        json["skipped"][0],
        serde_json::json!({"name": "Wes", "repo": "wes/app", "reason": "no_access_or_missing"})
    );
}

#[tokio::test]
async fn test_write_into_unwritable_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "not a directory").unwrap();

    let snapshot = Snapshot::new(now(), 7, vec![], vec![], vec![]);
    let err = snapshot.write_to(&blocker.join("out.json")).await.unwrap_err();
    assert!(err.to_string().starts_with("Failed to write snapshot"), "{err}");
}

#[test]
fn test_load_roster_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    std::fs::write(
        &path,
        "Name, GitHub_URL, App URL\n\
         Xia, https://github.com/xia/app, xia-app.bolt.host\n\
         Yan, ,\n\
         Zoe, zoe/site,\n",
    )
    .unwrap();

    let roster = load_roster(&path).unwrap();

    assert_eq!(
        roster,
        vec![
            RosterEntry::new("Xia", "https://github.com/xia/app").with_app_url("xia-app.bolt.host"),
            RosterEntry::new("Zoe", "zoe/site"),
        ]
    );
}

#[test]
fn test_missing_roster_names_the_path() {
    let err = load_roster(std::path::Path::new("/definitely/not/here.csv")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.csv"));
}
