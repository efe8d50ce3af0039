//! Sink trait and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::board::Board;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Storage is not connected")]
    NotConnected,

    #[error("Operational error: {0}")]
    Operational(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Connection state reported by a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkStatus {
    /// No connection has been established yet
    NotConnected,

    /// The sink is ready to accept boards
    Connected,

    /// Connecting failed; the sink will not become ready
    Failed,
}

impl fmt::Display for SinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotConnected => "not connected",
            Self::Connected => "connected",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Category and clue counts held by a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreTotals {
    pub categories: u64,
    pub clues: u64,
}

/// Trait for storage backend implementations
///
/// A sink is driven from a single task only, so implementations need no
/// internal locking. Every method other than `init_connection` and `status`
/// may assume the connection was established.
pub trait Sink: Send {
    /// Opens the underlying connection and prepares the store
    fn init_connection(&mut self) -> StorageResult<()>;

    /// Reports the current connection state
    fn status(&self) -> SinkStatus;

    /// Persists every category of a board
    fn save(&mut self, board: &Board) -> StorageResult<()>;

    /// Counts what the store currently holds
    fn totals(&self) -> StorageResult<StoreTotals>;

    /// Flushes and releases the connection
    fn close(&mut self) -> StorageResult<()>;
}
