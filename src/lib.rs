//! `kodegen_leaderboard` - student activity leaderboards via Octocrab
//!
//! This library reads a roster of student repositories, queries GitHub for
//! recent commits and pull requests, derives engagement metrics and badges,
//! and produces a deterministic, ranked snapshot document.

// Module declarations
pub mod github;
pub mod leaderboard;
pub mod runtime;

// Re-export runtime types
pub use runtime::AsyncTask;

// Re-export GitHub client types
pub use github::{GitHubClient, GitHubClientBuilder, ListCommitsOptions};

// Re-export GitHub error types
pub use github::{GitHubError, GitHubResult};

// Re-export leaderboard types for public API
pub use leaderboard::{
    Activity,
    ActivitySource,
    Badge,
    CommitEvent,
    Diagnostic,
    DiagnosticLevel,
    GitHubActivitySource,
    Leaderboard,
    LeaderboardConfig,
    LeaderboardEntry,
    LeaderboardError,
    LeaderboardResult,
    Metrics,
    QueryKind,
    RateGate,
    RepoId,
    RosterEntry,
    RunReport,
    SkipReason,
    SkipRecord,
    Snapshot,
    StudentRecord,
    StudentUrls,
    SubdomainTable,
    TargetResolver,
    // Pure pipeline steps
    badges::evaluate_badges,
    metrics::{compute_metrics, streak, weighted_score},
    normalize::normalize_repo,
    ranking::rank_students,
    roster::{load_roster, parse_roster},
};
