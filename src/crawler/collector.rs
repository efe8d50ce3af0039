//! Collector and termination detection
//!
//! The collector is the only caller of the sink. It drains the output channel
//! and decides when the run is over: the output channel was empty for a full
//! poll interval and no worker is alive. Workers send their last board before
//! releasing their liveness guard, so one final non-blocking drain after the
//! liveness check picks up anything that raced in between.

use crate::board::Board;
use crate::crawler::worker::Liveness;
use crate::storage::Sink;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::timeout;

/// Default wait on the output channel before checking worker liveness
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What the collector saw and stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorReport {
    /// Boards received from workers
    pub boards_received: u64,

    /// Boards the sink accepted
    pub boards_saved: u64,

    /// Boards lost to sink errors
    pub save_failures: u64,

    /// Categories in accepted boards
    pub categories: u64,

    /// Clues in accepted boards
    pub clues: u64,

    /// True once termination was detected
    pub finished: bool,
}

/// Drains worker output into a sink
pub struct Collector<'a> {
    sink: &'a mut dyn Sink,
    poll_interval: Duration,
    report: CollectorReport,
}

impl<'a> Collector<'a> {
    pub fn new(sink: &'a mut dyn Sink, poll_interval: Duration) -> Self {
        Self {
            sink,
            poll_interval,
            report: CollectorReport::default(),
        }
    }

    /// Runs until no further output can arrive
    pub async fn run(
        mut self,
        mut output: mpsc::Receiver<Board>,
        liveness: &Liveness,
    ) -> CollectorReport {
        loop {
            match timeout(self.poll_interval, output.recv()).await {
                Ok(Some(board)) => self.store(board),
                Ok(None) => {
                    tracing::debug!("Every worker has closed its output");
                    break;
                }
                Err(_) => {
                    if liveness.any_alive() {
                        tracing::trace!(
                            live = liveness.live_count(),
                            "Output empty, workers still running"
                        );
                        continue;
                    }
                    self.drain(&mut output);
                    break;
                }
            }
        }

        self.report.finished = true;
        tracing::info!(
            boards = self.report.boards_saved,
            failures = self.report.save_failures,
            "Collector finished"
        );
        self.report
    }

    /// Stores whatever is already buffered without waiting
    fn drain(&mut self, output: &mut mpsc::Receiver<Board>) {
        loop {
            match output.try_recv() {
                Ok(board) => self.store(board),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Saves one board; sink errors are reported and the board is dropped
    fn store(&mut self, board: Board) {
        self.report.boards_received += 1;
        let categories = board.len() as u64;
        let clues = board.clue_count() as u64;

        match self.sink.save(&board) {
            Ok(()) => {
                self.report.boards_saved += 1;
                self.report.categories += categories;
                self.report.clues += clues;
            }
            Err(e) => {
                tracing::error!("Failed to save board ({} categories): {}", categories, e);
                self.report.save_failures += 1;
            }
        }
    }
}
