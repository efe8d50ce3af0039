//! Crawler coordinator - pipeline orchestration
//!
//! This module wires the pipeline together:
//! - Waiting for the storage backend to report itself ready
//! - Resolving the starting season
//! - Spawning the URL producer and the worker pool
//! - Running the collector until termination is detected
//! - Joining every task and building the run summary
//!
//! The pool is joined before the producer. A producer still blocked on a
//! full queue once every worker is gone is cancelled after one poll interval.

use crate::config::Config;
use crate::crawler::collector::Collector;
use crate::crawler::discovery::fetch_current_season;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::producer::{ProducerReport, SeasonMode, UrlProducer};
use crate::crawler::queue::{WorkItem, WorkQueue};
use crate::crawler::worker::{aggregate_reports, WorkerPool};
use crate::output::RunSummary;
use crate::storage::{open_sink, Sink, SinkSession, SinkStatus};
use crate::{Result, ScrapeError};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use url::Url;

/// Which seasons a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlPlan {
    /// First season to crawl; None asks the archive for its latest season
    pub start_season: Option<u32>,

    pub mode: SeasonMode,
}

impl CrawlPlan {
    /// The latest season and every earlier one
    pub fn everything() -> Self {
        Self {
            start_season: None,
            mode: SeasonMode::Descending,
        }
    }

    /// Exactly one season
    pub fn single(season: u32) -> Self {
        Self {
            start_season: Some(season),
            mode: SeasonMode::Single,
        }
    }

    /// `season` and every earlier one
    pub fn descending_from(season: u32) -> Self {
        Self {
            start_season: Some(season),
            mode: SeasonMode::Descending,
        }
    }
}

impl Default for CrawlPlan {
    fn default() -> Self {
        Self::everything()
    }
}

impl fmt::Display for CrawlPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start_season, self.mode) {
            (None, SeasonMode::Single) => write!(f, "current season only"),
            (None, SeasonMode::Descending) => write!(f, "current season down to season 1"),
            (Some(n), SeasonMode::Single) => write!(f, "season {} only", n),
            (Some(n), SeasonMode::Descending) => write!(f, "season {} down to season 1", n),
        }
    }
}

/// Polls the sink until it reports `Connected`
///
/// `Failed` aborts immediately; still `NotConnected` after `attempts`
/// checks is a timeout.
pub async fn wait_for_sink(sink: &dyn Sink, attempts: u32, interval: Duration) -> Result<()> {
    for attempt in 1..=attempts {
        match sink.status() {
            SinkStatus::Connected => {
                tracing::debug!(attempt, "Storage ready");
                return Ok(());
            }
            SinkStatus::Failed => return Err(ScrapeError::SinkFailed),
            SinkStatus::NotConnected => {
                tracing::info!("Waiting for storage ({}/{})", attempt, attempts);
                if attempt < attempts {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    Err(ScrapeError::SinkTimeout { attempts })
}

/// Main pipeline coordinator
pub struct Coordinator {
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
    base_url: Url,
}

impl Coordinator {
    /// Creates a coordinator that fetches through `fetcher`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - The configured base URL is unusable
    pub fn new(config: Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let base_url = config.base_url()?;
        Ok(Self {
            config,
            fetcher,
            base_url,
        })
    }

    /// Determines the first season of the plan
    ///
    /// Failing to find the archive's current season is fatal: there is
    /// nothing to crawl.
    pub async fn resolve_start_season(&self, plan: &CrawlPlan) -> Result<u32> {
        if let Some(season) = plan.start_season {
            return Ok(season);
        }

        let season = fetch_current_season(self.fetcher.as_ref(), &self.base_url)
            .await
            .ok_or_else(|| {
                ScrapeError::SeasonDiscovery(format!(
                    "no season marker found at {}",
                    self.base_url
                ))
            })?;
        tracing::info!(season, "Resolved current season");
        Ok(season)
    }

    /// Runs the whole pipeline into `sink`
    ///
    /// The sink must already be connected. Returns once the collector has
    /// detected termination and every task has been joined.
    pub async fn run(&self, plan: &CrawlPlan, sink: &mut dyn Sink) -> Result<RunSummary> {
        let start_season = self.resolve_start_season(plan).await?;
        let started = Instant::now();
        let crawler = &self.config.crawler;

        tracing::info!(
            "Starting scrape: {}, {} workers",
            CrawlPlan {
                start_season: Some(start_season),
                mode: plan.mode
            },
            crawler.workers
        );

        let queue = WorkQueue::new(crawler.queue_capacity);
        let (output_tx, output_rx) = mpsc::channel(crawler.output_capacity);

        let producer = spawn_producer(
            UrlProducer::new(
                Arc::clone(&self.fetcher),
                self.base_url.clone(),
                queue.clone(),
            ),
            queue.clone(),
            start_season,
            plan.mode,
        );

        // The pool owns the only senders, so the channel closes when the
        // last worker exits.
        let pool = WorkerPool::spawn(
            crawler.workers,
            queue,
            Arc::clone(&self.fetcher),
            output_tx,
        );
        let liveness = pool.liveness();

        let collected = Collector::new(sink, crawler.poll_interval())
            .run(output_rx, &liveness)
            .await;

        let workers = aggregate_reports(&pool.join().await);
        let produced = producer.finish(crawler.poll_interval()).await?;

        let summary = RunSummary::from_reports(&produced, &workers, &collected, started.elapsed());
        tracing::info!(
            categories = summary.categories,
            clues = summary.clues,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Scrape finished"
        );
        Ok(summary)
    }
}

/// The supervised producer task
struct ProducerTask {
    supervisor: JoinHandle<ProducerReport>,
    producer: AbortHandle,
}

impl ProducerTask {
    /// Waits up to `grace` for the producer's report, then cancels it
    ///
    /// Only called once the pool has exited, when nothing can drain the
    /// queue any more. A cancelled producer reports nothing.
    async fn finish(mut self, grace: Duration) -> Result<ProducerReport> {
        if let Ok(report) = tokio::time::timeout(grace, &mut self.supervisor).await {
            return Ok(report?);
        }

        tracing::warn!("URL producer outlived the worker pool, cancelling it");
        self.producer.abort();

        // The supervisor itself may be stuck relaying end of work into a full queue
        match tokio::time::timeout(grace, &mut self.supervisor).await {
            Ok(report) => Ok(report?),
            Err(_) => {
                self.supervisor.abort();
                Ok(ProducerReport::default())
            }
        }
    }
}

/// Spawns the producer so that workers are released even if it panics
fn spawn_producer(
    producer: UrlProducer,
    queue: WorkQueue,
    start_season: u32,
    mode: SeasonMode,
) -> ProducerTask {
    let inner = tokio::spawn(producer.run(start_season, mode));
    let abort = inner.abort_handle();

    let supervisor = tokio::spawn(async move {
        match inner.await {
            Ok(report) => report,
            Err(e) if e.is_cancelled() => ProducerReport::default(),
            Err(e) => {
                tracing::error!("URL producer failed: {}", e);
                queue.push(WorkItem::EndOfWork).await;
                ProducerReport::default()
            }
        }
    });

    ProducerTask {
        supervisor,
        producer: abort,
    }
}

/// Runs a complete scrape against the configured archive and storage
///
/// This is the main entry point. It will:
/// 1. Pick the storage backend from the connection string
/// 2. Connect and wait for the backend to become ready
/// 3. Build the HTTP client
/// 4. Run the pipeline
/// 5. Close the storage on every exit path
///
/// # Example
///
/// ```no_run
/// use jarchive_scraper::config::Config;
/// use jarchive_scraper::crawler::{run_scrape, CrawlPlan};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_scrape(Config::default(), CrawlPlan::single(40)).await?;
/// println!("{}", summary.headline());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config, plan: CrawlPlan) -> Result<RunSummary> {
    let mut session = SinkSession::new(open_sink(&config.storage.connection)?);

    if let Err(e) = session.sink_mut().init_connection() {
        tracing::error!("Failed to connect to storage: {}", e);
        return Err(e.into());
    }
    wait_for_sink(
        session.sink(),
        config.storage.connect_attempts,
        config.storage.connect_interval(),
    )
    .await?;

    let fetcher = Arc::new(HttpFetcher::from_config(&config.user_agent, &config.crawler)?);
    let coordinator = Coordinator::new(config, fetcher)?;
    coordinator.run(&plan, session.sink_mut()).await
}
