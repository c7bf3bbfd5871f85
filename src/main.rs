// Leaderboard snapshot builder
//
// Reads a frozen roster CSV, evaluates every student repository against the
// GitHub API and writes one leaderboard JSON document.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use kodegen_tools_leaderboard::{Leaderboard, LeaderboardConfig, load_roster};
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "kodegen-leaderboard")]
#[command(about = "Build a static leaderboard JSON from a frozen roster CSV", long_about = None)]
struct Cli {
    /// Roster CSV, e.g. data/students.csv
    csv: PathBuf,
    /// Output JSON path, e.g. web/leaderboard.json
    out: PathBuf,
    /// Activity window in days
    #[arg(long)]
    days: Option<u32>,
    /// Subdomain table JSON
    #[arg(long, default_value = "subdomains.json")]
    subdomains: PathBuf,
    /// TOML config file; flags and environment take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// GitHub token (falls back to GITHUB_TOKEN, then GH_TOKEN)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Students evaluated concurrently
    #[arg(long)]
    concurrency: Option<usize>,
    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Report degraded queries at warn level
    #[arg(long, short)]
    verbose: bool,
    /// Exit non-zero when no student could be evaluated
    #[arg(long)]
    fail_on_empty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mut config = LeaderboardConfig::default();
    if let Some(path) = &cli.config {
        config = config
            .merge_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
    }
    if let Some(token) = cli.token.clone() {
        config.api_token = token;
    }
    config = config.with_env();
    if cli.verbose {
        config = config.with_verbose(true);
    }
    if let Some(days) = cli.days {
        config = config.with_window_days(days);
    }
    if let Some(concurrency) = cli.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let roster = load_roster(&cli.csv).context("failed to load roster")?;
    let leaderboard = Leaderboard::from_config(config)
        .context("failed to set up GitHub client")?
        .with_subdomains_file(&cli.subdomains);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, abandoning in-flight requests");
            on_signal.cancel();
        }
    });

    let report = leaderboard.run_with_cancel(&roster, Utc::now(), &cancel).await;

    for diagnostic in report.errors() {
        error!("{diagnostic}");
    }
    let warnings = report.warnings().count();
    if warnings > 0 && !leaderboard.config().verbose {
        warn!("{warnings} queries degraded to empty results (use --verbose for details)");
    }
    if report.rate_limit_hits > 0 {
        info!("Hit the API rate limit {} times", report.rate_limit_hits);
    }

    if report.cancelled {
        bail!("run cancelled, {} not written", cli.out.display());
    }

    report
        .snapshot
        .write_to(&cli.out)
        .await
        .with_context(|| format!("failed to write {}", cli.out.display()))?;
    info!("Wrote {}", cli.out.display());

    if report.is_empty() {
        warn!("Snapshot contains no students");
        if cli.fail_on_empty {
            bail!("no students could be evaluated");
        }
    }

    Ok(())
}
