//! Student activity leaderboard
//!
//! Normalizes roster repositories, drops the ones the credentials cannot
//! see, fans out activity queries with bounded concurrency, reduces them to
//! metrics and badges, and ranks the result into a [`Snapshot`].

pub mod access;
pub mod badges;
pub mod config;
pub mod fetch;
pub mod metrics;
pub mod normalize;
pub mod rate_limiter;
pub mod ranking;
pub mod roster;
pub mod snapshot;
pub mod source;
pub mod subdomains;
pub mod targets;
pub mod types;

pub use config::LeaderboardConfig;
pub use rate_limiter::RateGate;
pub use snapshot::Snapshot;
pub use source::{ActivitySource, GitHubActivitySource};
pub use targets::{SubdomainTable, TargetResolver};
pub use types::{
    Activity, Badge, CommitEvent, Diagnostic, DiagnosticLevel, LeaderboardEntry,
    LeaderboardError, LeaderboardResult, Metrics, QueryKind, RepoId, RosterEntry, SkipReason,
    SkipRecord, StudentRecord, StudentUrls,
};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::github::GitHubClient;
use fetch::{FetchWindows, fetch_activity};

/// Result of one run: the snapshot plus everything that degraded on the way.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub snapshot: Snapshot,
    pub diagnostics: Vec<Diagnostic>,
    /// The run was cancelled; only students finished before that are included.
    pub cancelled: bool,
    pub rate_limit_hits: u32,
}

impl RunReport {
    /// No student produced a record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.students.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
    }
}

enum Outcome {
    Record(StudentRecord),
    Skipped(SkipRecord),
}

struct Processed {
    index: usize,
    outcome: Outcome,
    diagnostics: Vec<Diagnostic>,
}

/// The aggregation engine.
pub struct Leaderboard<S> {
    source: S,
    config: LeaderboardConfig,
    gate: RateGate,
    resolver: TargetResolver,
    subdomains: SubdomainTable,
    setup_diagnostics: Vec<Diagnostic>,
}

impl Leaderboard<GitHubActivitySource> {
    /// Engine backed by the GitHub REST API.
    pub fn from_config(config: LeaderboardConfig) -> LeaderboardResult<Self> {
        config.validate()?;
        let client = GitHubClient::with_token(config.api_token.clone())
            .map_err(|e| LeaderboardError::Config(e.to_string()))?;
        let source =
            GitHubActivitySource::new(client, config.commit_page_size, config.max_commit_pages);
        Ok(Self::with_source(source, config))
    }
}

impl<S: ActivitySource> Leaderboard<S> {
    pub fn with_source(source: S, config: LeaderboardConfig) -> Self {
        Self {
            gate: RateGate::new(&config),
            resolver: TargetResolver::new(&config.app_host_suffix, &config.public_domain),
            source,
            config,
            subdomains: SubdomainTable::new(),
            setup_diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_subdomains(mut self, table: SubdomainTable) -> Self {
        self.subdomains = table;
        self
    }

    /// Load the subdomain table from disk. A bad file leaves the table empty
    /// and is reported in every run's diagnostics.
    #[must_use]
    pub fn with_subdomains_file(mut self, path: &Path) -> Self {
        match subdomains::load_subdomain_table(path) {
            Ok(table) => {
                debug!("Loaded {} subdomain mappings", table.len());
                self.subdomains = table;
            }
            Err(message) => {
                warn!("Subdomain table unavailable, public URLs will be unset: {message}");
                self.subdomains = SubdomainTable::new();
                self.setup_diagnostics.push(Diagnostic {
                    level: DiagnosticLevel::Warning,
                    student: None,
                    repo: None,
                    query: QueryKind::Subdomains,
                    message,
                });
            }
        }
        self
    }

    #[must_use]
    pub fn config(&self) -> &LeaderboardConfig {
        &self.config
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Evaluate `roster` against the activity windows ending at `now`.
    pub async fn run(&self, roster: &[RosterEntry], now: DateTime<Utc>) -> RunReport {
        self.run_with_cancel(roster, now, &CancellationToken::new())
            .await
    }

    /// Like [`Leaderboard::run`], stopping early when `cancel` fires.
    /// Students still in flight at that point are left out entirely.
    pub async fn run_with_cancel(
        &self,
        roster: &[RosterEntry],
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> RunReport {
        let windows = FetchWindows::new(now, self.config.window_days, self.config.long_window_days);

        let candidates: Vec<(usize, &RosterEntry, RepoId)> = roster
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match normalize::normalize_repo(&entry.repo) {
                Some(repo) => Some((index, entry, repo)),
                None => {
                    debug!("Ignoring unparseable repository reference {:?}", entry.repo);
                    None
                }
            })
            .collect();

        info!(
            "Evaluating {} of {} roster rows ({} workers)",
            candidates.len(),
            roster.len(),
            self.config.concurrency
        );

        let mut pending = stream::iter(candidates)
            .map(|(index, entry, repo)| self.process_student(index, entry, repo, windows))
            .buffer_unordered(self.config.concurrency.max(1));

        let mut processed = Vec::new();
        let mut cancelled = false;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = pending.next() => match next {
                    Some(done) => processed.push(done),
                    None => break,
                },
            }
        }
        drop(pending);

        if cancelled {
            warn!(
                "Run cancelled after {} students; in-flight students are excluded",
                processed.len()
            );
        }

        // Arrival order is irrelevant; restore roster order before ranking.
        processed.sort_by_key(|p| p.index);

        let mut diagnostics = self.setup_diagnostics.clone();
        let mut students = Vec::new();
        let mut skipped = Vec::new();
        for done in processed {
            diagnostics.extend(done.diagnostics);
            match done.outcome {
                Outcome::Record(record) => students.push(record),
                Outcome::Skipped(skip) => skipped.push(skip),
            }
        }

        let leaderboard = ranking::rank_students(&mut students);
        if students.is_empty() {
            warn!("No students could be evaluated");
        }
        info!(
            "Ranked {} students, skipped {}, {} degraded queries",
            students.len(),
            skipped.len(),
            diagnostics.len()
        );

        RunReport {
            snapshot: Snapshot::new(now, self.config.window_days, students, leaderboard, skipped),
            diagnostics,
            cancelled,
            rate_limit_hits: self.gate.rate_limit_hits().await,
        }
    }

    async fn process_student(
        &self,
        index: usize,
        entry: &RosterEntry,
        repo: RepoId,
        windows: FetchWindows,
    ) -> Processed {
        let name = match entry.name.trim() {
            "" => repo.owner.clone(),
            name => name.to_string(),
        };
        let mut diagnostics = Vec::new();

        let skip = match access::can_view(&self.source, &self.gate, &repo).await {
            Ok(true) => None,
            Ok(false) => Some(SkipReason::NoAccessOrMissing),
            Err(e) => {
                diagnostics.push(self.diagnostic(
                    DiagnosticLevel::Error,
                    &name,
                    &repo,
                    QueryKind::Access,
                    e.to_string(),
                ));
                Some(SkipReason::AccessCheckFailed)
            }
        };
        if let Some(reason) = skip {
            return Processed {
                index,
                outcome: Outcome::Skipped(SkipRecord {
                    name,
                    repo: repo.full_name(),
                    reason,
                }),
                diagnostics,
            };
        }

        let (activity, failures) = fetch_activity(&self.source, &self.gate, &repo, &windows).await;
        for failure in failures {
            diagnostics.push(self.diagnostic(
                DiagnosticLevel::Warning,
                &name,
                &repo,
                failure.query,
                failure.error.to_string(),
            ));
        }

        let metrics = metrics::compute_metrics(&activity, windows.today());
        let badges = badges::evaluate_badges(&metrics);
        let urls = self
            .resolver
            .resolve(entry.app_url.as_deref(), &self.subdomains);

        debug!("{name} ({repo}): score {}, streak {}", metrics.score, metrics.streak);

        Processed {
            index,
            outcome: Outcome::Record(StudentRecord {
                name,
                repo: repo.full_name(),
                owner: repo.owner.clone(),
                metrics,
                badges,
                urls,
            }),
            diagnostics,
        }
    }

    /// Build a diagnostic and log it. Warnings only reach warn level when
    /// `verbose` is set.
    fn diagnostic(
        &self,
        level: DiagnosticLevel,
        student: &str,
        repo: &RepoId,
        query: QueryKind,
        message: String,
    ) -> Diagnostic {
        let diagnostic = Diagnostic {
            level,
            student: Some(student.to_string()),
            repo: Some(repo.full_name()),
            query,
            message,
        };
        if level == DiagnosticLevel::Error || self.config.verbose {
            warn!("Degraded query: {diagnostic}");
        } else {
            debug!("Degraded query: {diagnostic}");
        }
        diagnostic
    }
}
