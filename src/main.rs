//! jarchive-scraper main entry point
//!
//! This is the command-line interface for the trivia archive scraper.

use anyhow::Context;
use clap::Parser;
use jarchive_scraper::config::{load_or_default, validate, Config};
use jarchive_scraper::crawler::{run_scrape, CrawlPlan};
use jarchive_scraper::output::{load_statistics, print_statistics, print_summary};
use jarchive_scraper::storage::{determine_backend, open_sink, SinkSession};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// jarchive-scraper: collects trivia categories and clues from a game archive
///
/// Without a season, the archive's latest season is looked up and every
/// season from there down to season 1 is scraped.
#[derive(Parser, Debug)]
#[command(name = "jarchive-scraper")]
#[command(version)]
#[command(about = "Scrapes trivia game boards into a database", long_about = None)]
struct Cli {
    /// Season to scrape (only this season unless --descend is given)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    season: Option<u32>,

    /// Continue with every earlier season after --season
    #[arg(long, requires = "season")]
    descend: bool,

    /// Storage connection string (sqlite:///path.db or jsonl://path.jsonl)
    #[arg(long, value_name = "CONNECTION")]
    db: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without scraping
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show totals from the existing store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

impl Cli {
    fn plan(&self) -> CrawlPlan {
        match (self.season, self.descend) {
            (None, _) => CrawlPlan::everything(),
            (Some(season), false) => CrawlPlan::single(season),
            (Some(season), true) => CrawlPlan::descending_from(season),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &cli.plan())
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_scrape(config, cli.plan()).await
    }
}

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_or_default(Some(path.as_path()))
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => load_or_default(None)?,
    };

    if let Some(db) = &cli.db {
        config.storage.connection = db.clone();
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    validate(&config)?;

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jarchive_scraper=info,warn"),
            1 => EnvFilter::new("jarchive_scraper=debug,info"),
            2 => EnvFilter::new("jarchive_scraper=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &Config, plan: &CrawlPlan) -> anyhow::Result<()> {
    let backend = determine_backend(&config.storage.connection)?;
    let base_url = config.base_url()?;

    println!("=== jarchive-scraper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Archive: {}", base_url);
    println!("  Seasons: {}", plan);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Queue capacity: {}", config.crawler.queue_capacity);
    println!("  Output capacity: {}", config.crawler.output_capacity);
    println!("  Poll interval: {}ms", config.crawler.poll_interval_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);

    println!("\nStorage:");
    println!("  Connection: {}", config.storage.connection);
    println!("  Backend: {:?}", backend);
    println!(
        "  Readiness: {} attempts, {}ms apart",
        config.storage.connect_attempts, config.storage.connect_interval_ms
    );

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --stats mode: shows totals from the existing store
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Storage: {}\n", config.storage.connection);

    let mut session = SinkSession::new(open_sink(&config.storage.connection)?);
    session
        .sink_mut()
        .init_connection()
        .context("failed to open storage")?;

    let stats = load_statistics(session.sink())?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, plan: CrawlPlan) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} into {} with {} workers",
        plan,
        config.storage.connection,
        config.crawler.workers
    );

    let summary = run_scrape(config, plan).await?;
    print_summary(&summary);

    Ok(())
}
