//! Work queue shared by the URL producer and the worker pool
//!
//! The queue is a bounded FIFO with many producers and many consumers. The
//! end of work is signalled in-band with [`WorkItem::EndOfWork`]: the producer
//! pushes it exactly once, and every worker that pops it pushes it back before
//! exiting so that each peer observes it in turn.

use async_channel::{Receiver, Sender};

/// A unit of work on the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    /// A game page to fetch and extract
    Url(String),

    /// No further items will ever be enqueued
    EndOfWork,
}

impl WorkItem {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::EndOfWork)
    }
}

/// Bounded multi-consumer FIFO of work items
///
/// Cloning the queue yields another handle to the same underlying channel.
/// Each pop removes the item, so an item is consumed by exactly one worker.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    tx: Sender<WorkItem>,
    rx: Receiver<WorkItem>,
}

impl WorkQueue {
    /// Creates a queue holding at most `capacity` pending items
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = async_channel::bounded(capacity.max(1));
        Self { tx, rx }
    }

    /// Appends an item, waiting while the queue is full
    pub async fn push(&self, item: WorkItem) {
        // Every handle holds a receiver, so the channel stays open while `self` lives
        if self.tx.send(item).await.is_err() {
            tracing::error!("Work queue closed while pushing");
        }
    }

    /// Removes the next item, waiting until one is available
    pub async fn pop(&self) -> WorkItem {
        self.rx.recv().await.unwrap_or(WorkItem::EndOfWork)
    }

    /// Removes the next item if one is immediately available
    pub fn try_pop(&self) -> Option<WorkItem> {
        self.rx.try_recv().ok()
    }

    /// Number of items currently waiting in the queue
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
