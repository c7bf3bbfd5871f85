//! Type definitions for the leaderboard engine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Engine-level failures. Per-query problems never surface here; they
/// degrade into [`Diagnostic`]s instead.
#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("Failed to read roster {path}: {source}")]
    Roster {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write snapshot {path}: {source}")]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub API token is required")]
    MissingToken,
}

pub type LeaderboardResult<T> = Result<T, LeaderboardError>;

/// One roster row as handed over by the CSV mapping step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    /// Raw repository reference: a URL or a bare `owner/repo`.
    pub repo: String,
    pub app_url: Option<String>,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repo: repo.into(),
            app_url: None,
        }
    }

    #[must_use]
    pub fn with_app_url(mut self, app_url: impl Into<String>) -> Self {
        self.app_url = Some(app_url.into());
        self
    }
}

/// Canonical repository identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// `owner/repo`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A commit reduced to the UTC calendar day it was authored on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitEvent {
    pub author_date: NaiveDate,
}

impl CommitEvent {
    #[must_use]
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            author_date: instant.date_naive(),
        }
    }
}

/// Raw activity for one repository, before reduction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Activity {
    pub commits_window: Vec<CommitEvent>,
    pub commits_30d: Vec<CommitEvent>,
    pub prs_opened: u32,
    pub prs_merged: u32,
}

/// Per-student engagement metrics.
///
/// `score` is derived; see [`crate::leaderboard::metrics::weighted_score`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "commits_7d")]
    pub commits_7d: u32,
    #[serde(rename = "commit_days_7d")]
    pub commit_days_7d: u32,
    #[serde(rename = "commits_30d")]
    pub commits_30d: u32,
    #[serde(rename = "pr_opened_7d")]
    pub pr_opened_7d: u32,
    #[serde(rename = "pr_merged_7d")]
    pub pr_merged_7d: u32,
    pub streak: u32,
    pub score: u64,
}

/// Achievement tags. Declaration order is the rendering order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
    WeekWarrior,
    PrStarter,
    MergeMaster,
    CommitCadence,
}

impl Badge {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::WeekWarrior => "week-warrior",
            Badge::PrStarter => "pr-starter",
            Badge::MergeMaster => "merge-master",
            Badge::CommitCadence => "commit-cadence",
        }
    }
}

/// Application links for a student. Wire names match the web frontend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUrls {
    #[serde(rename = "bolt")]
    pub app_url: Option<String>,
    #[serde(rename = "illinihunt")]
    pub public_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    /// `owner/repo`
    pub repo: String,
    pub owner: String,
    pub metrics: Metrics,
    pub badges: BTreeSet<Badge>,
    pub urls: StudentUrls,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub repo: String,
    pub score: u64,
    pub rank: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoAccessOrMissing,
    /// The visibility probe itself failed (network, 5xx, auth).
    AccessCheckFailed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub name: String,
    pub repo: String,
    pub reason: SkipReason,
}

/// Which external query a diagnostic is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Access,
    CommitsWindow,
    Commits30d,
    PrsOpened,
    PrsMerged,
    Subdomains,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Warning,
    Error,
}

/// A degraded query, reported instead of printed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub student: Option<String>,
    pub repo: Option<String>,
    pub query: QueryKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.query)?;
        if let Some(repo) = &self.repo {
            write!(f, " [{repo}]")?;
        }
        if let Some(student) = &self.student {
            write!(f, " ({student})")?;
        }
        write!(f, ": {}", self.message)
    }
}
