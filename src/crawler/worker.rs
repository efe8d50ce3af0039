//! Worker pool
//!
//! Each worker repeatedly pops a work item, fetches the page, extracts its
//! board and forwards non-empty boards to the collector. On
//! [`WorkItem::EndOfWork`] the worker pushes the marker back for its peers and
//! exits, so the pool drains without any worker knowing the pool size.
//!
//! Liveness is published through a shared counter that each worker holds a
//! guard on. The guard is released only after the worker has sent all of its
//! output, so a collector that reads zero live workers has already been
//! handed every board.

use crate::board::Board;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::queue::{WorkItem, WorkQueue};
use crate::extract::extract_board;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Per-worker counters, returned when the worker exits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Worker index within the pool
    pub id: usize,

    /// URLs popped from the queue
    pub items_taken: u64,

    /// Pages fetched successfully
    pub pages_fetched: u64,

    /// Pages dropped because the fetch failed
    pub transport_failures: u64,

    /// Pages that produced no categories
    pub empty_pages: u64,

    /// Boards forwarded to the collector
    pub boards_sent: u64,
}

/// Sums the counters of several workers
pub fn aggregate_reports(reports: &[WorkerReport]) -> WorkerReport {
    reports.iter().fold(WorkerReport::default(), |mut acc, r| {
        acc.items_taken += r.items_taken;
        acc.pages_fetched += r.pages_fetched;
        acc.transport_failures += r.transport_failures;
        acc.empty_pages += r.empty_pages;
        acc.boards_sent += r.boards_sent;
        acc
    })
}

/// Read-only view of how many workers are still running
#[derive(Debug, Clone)]
pub struct Liveness {
    live: Arc<AtomicUsize>,
}

impl Liveness {
    fn new() -> Self {
        Self {
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Registers one running worker; the returned guard unregisters it on drop
    fn register(&self) -> LivenessGuard {
        self.live.fetch_add(1, Ordering::AcqRel);
        LivenessGuard {
            live: Arc::clone(&self.live),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    pub fn any_alive(&self) -> bool {
        self.live_count() > 0
    }
}

/// Held by a running worker; dropping it (including on panic) marks it done
struct LivenessGuard {
    live: Arc<AtomicUsize>,
}

impl Drop for LivenessGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A fixed-size set of worker tasks
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerReport>>,
    liveness: Liveness,
}

impl WorkerPool {
    /// Spawns `size` workers sharing the work queue and output channel
    ///
    /// Every worker is registered as live before this returns, so a
    /// collector started afterwards never observes an empty pool early.
    pub fn spawn(
        size: usize,
        queue: WorkQueue,
        fetcher: Arc<dyn PageFetcher>,
        output: mpsc::Sender<Board>,
    ) -> Self {
        let liveness = Liveness::new();
        let handles = (0..size)
            .map(|id| {
                let worker = Worker {
                    id,
                    queue: queue.clone(),
                    fetcher: Arc::clone(&fetcher),
                    output: output.clone(),
                };
                let guard = liveness.register();
                tokio::spawn(async move {
                    let _guard = guard;
                    worker.run().await
                })
            })
            .collect();

        tracing::info!("Spawned {} workers", size);
        Self { handles, liveness }
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    /// Waits for every worker and collects their reports
    ///
    /// A worker that panicked is logged and contributes no report.
    pub async fn join(self) -> Vec<WorkerReport> {
        let mut reports = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }
        reports
    }
}

struct Worker {
    id: usize,
    queue: WorkQueue,
    fetcher: Arc<dyn PageFetcher>,
    output: mpsc::Sender<Board>,
}

impl Worker {
    async fn run(self) -> WorkerReport {
        let mut report = WorkerReport {
            id: self.id,
            ..Default::default()
        };

        loop {
            let url = match self.queue.pop().await {
                WorkItem::Url(url) => url,
                WorkItem::EndOfWork => {
                    tracing::debug!(worker = self.id, "Got end of work, relaying");
                    self.queue.push(WorkItem::EndOfWork).await;
                    break;
                }
            };

            report.items_taken += 1;
            self.process(&url, &mut report).await;
        }

        tracing::debug!(
            worker = self.id,
            pages = report.pages_fetched,
            failures = report.transport_failures,
            "Worker exiting"
        );
        report
    }

    /// Fetches and extracts one page; failures only reduce output
    async fn process(&self, url: &str, report: &mut WorkerReport) {
        tracing::debug!(worker = self.id, url = %url, "Scraping game");

        let markup = match self.fetcher.fetch(url).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!(worker = self.id, url = %url, "Dropping page: {}", e);
                report.transport_failures += 1;
                return;
            }
        };
        report.pages_fetched += 1;

        let board = extract_board(&markup);
        if board.is_empty() {
            tracing::info!(url = %url, "No categories extracted");
            report.empty_pages += 1;
            return;
        }

        tracing::debug!(
            url = %url,
            categories = board.len(),
            clues = board.clue_count(),
            "Forwarding board"
        );
        if self.output.send(board).await.is_err() {
            tracing::error!(url = %url, "Collector stopped before board could be delivered");
            return;
        }
        report.boards_sent += 1;
    }
}
