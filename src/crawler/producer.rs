//! URL producer
//!
//! Enumerates game page URLs season by season and feeds them to the work
//! queue. Once no further URLs will be produced, the producer enqueues a
//! single [`WorkItem::EndOfWork`] and stops.

use crate::crawler::discovery::fetch_season_game_urls;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::queue::{WorkItem, WorkQueue};
use std::sync::Arc;
use url::Url;

/// Which seasons the producer walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonMode {
    /// Only the starting season
    Single,

    /// The starting season, then each earlier season down to season 1
    Descending,
}

/// What the producer enqueued
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerReport {
    /// Seasons whose listing yielded at least one game URL
    pub seasons_visited: u32,

    /// Game URLs pushed onto the work queue
    pub urls_queued: usize,
}

/// Discovers game URLs and pushes them onto the work queue
pub struct UrlProducer {
    fetcher: Arc<dyn PageFetcher>,
    base_url: Url,
    queue: WorkQueue,
}

impl UrlProducer {
    pub fn new(fetcher: Arc<dyn PageFetcher>, base_url: Url, queue: WorkQueue) -> Self {
        Self {
            fetcher,
            base_url,
            queue,
        }
    }

    /// Enumerates seasons starting at `start_season`
    ///
    /// A season listing that yields no URLs (an exhausted archive or a failed
    /// request) ends production; URLs already queued are unaffected. The
    /// end-of-work marker is pushed on every return path.
    pub async fn run(self, start_season: u32, mode: SeasonMode) -> ProducerReport {
        let mut report = ProducerReport::default();

        match mode {
            SeasonMode::Single => {
                self.populate(start_season, &mut report).await;
            }
            SeasonMode::Descending => {
                let mut season = start_season;
                while season > 0 {
                    tracing::info!(season, "Getting game URLs");
                    if !self.populate(season, &mut report).await {
                        break;
                    }
                    season -= 1;
                }
            }
        }

        tracing::info!(
            "URLs exhausted after {} seasons ({} games), signalling end of work",
            report.seasons_visited,
            report.urls_queued
        );
        self.queue.push(WorkItem::EndOfWork).await;

        report
    }

    /// Queues one season's game URLs; returns false if the season was empty
    async fn populate(&self, season: u32, report: &mut ProducerReport) -> bool {
        let urls = fetch_season_game_urls(self.fetcher.as_ref(), &self.base_url, season).await;
        if urls.is_empty() {
            tracing::warn!(season, "No game URLs found, treating archive as exhausted");
            return false;
        }

        tracing::debug!(season, games = urls.len(), "Queueing season");
        report.seasons_visited += 1;
        for url in urls {
            self.queue.push(WorkItem::Url(url)).await;
            report.urls_queued += 1;
        }
        true
    }
}
