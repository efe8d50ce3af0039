//! Crawler module for the concurrent scrape pipeline
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` trait
//! - Season and game URL discovery
//! - The work queue with its end-of-work marker
//! - The URL producer, worker pool and collector
//! - Overall pipeline coordination

mod collector;
mod coordinator;
mod discovery;
mod fetcher;
mod producer;
mod queue;
mod worker;

pub use collector::{Collector, CollectorReport, DEFAULT_POLL_INTERVAL};
pub use coordinator::{run_scrape, wait_for_sink, Coordinator, CrawlPlan};
pub use discovery::{
    fetch_current_season, fetch_season_game_urls, parse_current_season, parse_season_game_urls,
    season_url,
};
pub use fetcher::{build_http_client, FetchError, FetchResult, HttpFetcher, PageFetcher};
pub use producer::{ProducerReport, SeasonMode, UrlProducer};
pub use queue::{WorkItem, WorkQueue};
pub use worker::{aggregate_reports, Liveness, WorkerPool, WorkerReport};
