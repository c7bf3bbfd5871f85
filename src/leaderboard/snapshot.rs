//! Snapshot document

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::leaderboard::types::{
    LeaderboardEntry, LeaderboardError, LeaderboardResult, SkipRecord, StudentRecord,
};

/// One run's output. Built once, written once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub window_days: u32,
    pub students: Vec<StudentRecord>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub skipped: Vec<SkipRecord>,
}

impl Snapshot {
    /// `generated_at` is truncated to whole seconds so the rendered
    /// timestamp parses back to the same value.
    #[must_use]
    pub fn new(
        generated_at: DateTime<Utc>,
        window_days: u32,
        students: Vec<StudentRecord>,
        leaderboard: Vec<LeaderboardEntry>,
        skipped: Vec<SkipRecord>,
    ) -> Self {
        Self {
            generated_at: generated_at.with_nanosecond(0).unwrap_or(generated_at),
            window_days,
            students,
            leaderboard,
            skipped,
        }
    }

    pub fn to_json(&self) -> LeaderboardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> LeaderboardResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write the pretty-printed document to `path`, creating parent
    /// directories as needed.
    pub async fn write_to(&self, path: &Path) -> LeaderboardResult<()> {
        let body = self.to_json()?;
        let io_err = |source: std::io::Error| LeaderboardError::SnapshotWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(path, body + "\n").await.map_err(io_err)
    }
}
