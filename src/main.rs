//! Company-Harvester main entry point
//!
//! This is the command-line interface for the Company-Harvester crawler.

use anyhow::Context;
use clap::Parser;
use company_harvester::config::{load_config_with_hash, Config};
use company_harvester::crawler::run_pass;
use company_harvester::output::{
    load_snapshot, print_snapshot_summary, print_statistics, SnapshotSummary,
};
use company_harvester::url::listing_page_url;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Company-Harvester: a company listing crawler
///
/// Walks the paginated company listing, collects every company that has open
/// job postings, and writes the result as a JSON snapshot.
#[derive(Parser, Debug)]
#[command(name = "company-harvester")]
#[command(version)]
#[command(about = "A company listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the existing snapshot file and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("company_harvester=info,warn"),
            1 => EnvFilter::new("company_harvester=debug,info"),
            2 => EnvFilter::new("company_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Company-Harvester Dry Run ===\n");

    println!("Site:");
    println!("  Listing: {}", config.site.listing_url);
    println!("  Profile: {}", config.site.organization_url);
    println!("  Job list: {}", config.site.organization_jobs_url);
    println!(
        "  First page URL: {}",
        listing_page_url(&config.site, config.site.first_page)
    );

    println!("\nFetcher:");
    println!("  Request timeout: {}ms", config.fetcher.request_timeout_ms);
    println!("  User agent: {}", config.fetcher.user_agent);

    println!("\nRetry:");
    println!(
        "  Timeout cooldown: {}s",
        config.retry.timeout_cooldown_secs
    );
    match config.retry.max_timeout_retries {
        Some(max) => println!("  Max timeout retries: {}", max),
        None => println!("  Max timeout retries: unbounded"),
    }
    println!("  Error policy: {:?}", config.retry.error_policy);
    println!("  Max error retries: {}", config.retry.max_error_retries);
    println!(
        "  Max consecutive skipped pages: {}",
        config.retry.max_consecutive_skipped_pages
    );

    println!("\nOutput:");
    println!("  Snapshot: {}", config.output.snapshot_path);
    println!("  Write empty snapshot: {}", config.output.write_empty);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: summarizes the persisted snapshot
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.snapshot_path);
    println!("Snapshot: {}\n", path.display());

    let snapshot = load_snapshot(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    print_snapshot_summary(&SnapshotSummary::from_snapshot(&snapshot));

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl pass");
            on_signal.cancel();
        }
    });

    match run_pass(&config, cancel).await {
        Ok(stats) => {
            tracing::info!("Crawl pass finished");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl pass failed: {}", e);
            Err(e.into())
        }
    }
}
