//! Configuration for leaderboard runs

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::leaderboard::types::{LeaderboardError, LeaderboardResult};

/// Configuration for a leaderboard run.
///
/// Everything the engine needs is passed in here; nothing is read from the
/// environment after construction.
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    pub api_token: String,
    /// Log degraded queries at warn level instead of debug.
    pub verbose: bool,
    /// Students processed concurrently.
    pub concurrency: usize,
    /// Outbound API calls in flight across all workers.
    pub max_in_flight: usize,
    /// Budget for a single API call.
    pub timeout: Duration,
    /// Short window in days (commits, commit days, pull requests).
    pub window_days: u32,
    /// Long window in days (30-day commits, streak).
    pub long_window_days: u32,
    pub commit_page_size: u8,
    pub max_commit_pages: u32,
    /// Retries after a rate-limit response before the query degrades.
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_cap: Duration,
    /// Hosting platform whose project ids can be proxied.
    pub app_host_suffix: String,
    /// Domain the proxy subdomains live under.
    pub public_domain: String,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            verbose: false,
            concurrency: 6,
            max_in_flight: 8,
            timeout: Duration::from_secs(15),
            window_days: 7,
            long_window_days: 30,
            commit_page_size: 100, // GitHub API max
            max_commit_pages: 3,
            max_retries: 4,
            backoff_base: Duration::from_secs(1),
            backoff_cap: Duration::from_secs(60),
            app_host_suffix: "bolt.host".to_string(),
            public_domain: "illinihunt.org".to_string(),
        }
    }
}

impl LeaderboardConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days.max(1);
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, base: Duration, cap: Duration, max_retries: u32) -> Self {
        self.backoff_base = base;
        self.backoff_cap = cap.max(base);
        self.max_retries = max_retries;
        self
    }

    /// Fill the token and verbosity from `GITHUB_TOKEN`/`GH_TOKEN` and
    /// `LEADERBOARD_VERBOSE=1` where they are not already set.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if self.api_token.is_empty() {
            self.api_token = std::env::var("GITHUB_TOKEN")
                .or_else(|_| std::env::var("GH_TOKEN"))
                .unwrap_or_default();
        }
        if std::env::var("LEADERBOARD_VERBOSE").is_ok_and(|v| v == "1") {
            self.verbose = true;
        }
        self
    }

    /// Overlay the values present in a TOML file.
    pub fn merge_file(self, path: &Path) -> LeaderboardResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            LeaderboardError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        self.merge_toml(&text)
            .map_err(|e| LeaderboardError::Config(format!("{}: {e}", path.display())))
    }

    pub fn merge_toml(mut self, text: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(text)?;

        if let Some(v) = file.api_token {
            self.api_token = v;
        }
        if let Some(v) = file.verbose {
            self.verbose = v;
        }
        if let Some(v) = file.concurrency {
            self = self.with_concurrency(v);
        }
        if let Some(v) = file.max_in_flight {
            self = self.with_max_in_flight(v);
        }
        if let Some(v) = file.timeout_secs {
            self.timeout = Duration::from_secs(v);
        }
        if let Some(v) = file.window_days {
            self = self.with_window_days(v);
        }
        if let Some(v) = file.max_commit_pages {
            self.max_commit_pages = v.max(1);
        }
        if let Some(v) = file.max_retries {
            self.max_retries = v;
        }
        if let Some(v) = file.backoff_base_ms {
            self.backoff_base = Duration::from_millis(v);
        }
        if let Some(v) = file.backoff_cap_ms {
            self.backoff_cap = Duration::from_millis(v).max(self.backoff_base);
        }
        if let Some(v) = file.app_host_suffix {
            self.app_host_suffix = v;
        }
        if let Some(v) = file.public_domain {
            self.public_domain = v;
        }
        Ok(self)
    }

    pub fn validate(&self) -> LeaderboardResult<()> {
        if self.api_token.trim().is_empty() {
            return Err(LeaderboardError::MissingToken);
        }
        if self.timeout.is_zero() {
            return Err(LeaderboardError::Config("timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// On-disk form; every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_token: Option<String>,
    verbose: Option<bool>,
    concurrency: Option<usize>,
    max_in_flight: Option<usize>,
    timeout_secs: Option<u64>,
    window_days: Option<u32>,
    max_commit_pages: Option<u32>,
    max_retries: Option<u32>,
    backoff_base_ms: Option<u64>,
    backoff_cap_ms: Option<u64>,
    app_host_suffix: Option<String>,
    public_domain: Option<String>,
}
