//! Storage module for persisting scraped boards
//!
//! This module owns everything behind the [`Sink`] capability:
//! - SQLite relational store (`categories` and `clues` tables)
//! - JSON-lines document store (one document per category)
//! - Backend selection from a connection string
//! - A scoped session that closes the sink on every exit path

mod document;
mod schema;
mod sqlite;
mod traits;

pub use document::DocumentSink;
pub use sqlite::SqliteSink;
pub use traits::{Sink, SinkStatus, StorageError, StorageResult, StoreTotals};

use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// The closed set of storage backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite(PathBuf),
    Document(PathBuf),
}

/// Picks a backend by inspecting the connection string
///
/// `sqlite:///relative.db` names `relative.db`, `sqlite:////abs/path.db`
/// names `/abs/path.db`. A bare path is accepted when its extension
/// identifies the backend.
pub fn determine_backend(connection: &str) -> ConfigResult<BackendKind> {
    let connection = connection.trim();

    if let Some(rest) = connection.strip_prefix("sqlite:///") {
        return non_empty_path(connection, rest).map(BackendKind::Sqlite);
    }
    if let Some(rest) = connection.strip_prefix("jsonl://") {
        return non_empty_path(connection, rest).map(BackendKind::Document);
    }
    if connection.starts_with("mongodb://") || connection.starts_with("mongodb+srv://") {
        return Err(ConfigError::UnsupportedBackend(format!(
            "{} (no document-database driver is available, use jsonl:// instead)",
            connection
        )));
    }

    if connection.ends_with(".db") || connection.ends_with(".sqlite") {
        return Ok(BackendKind::Sqlite(PathBuf::from(connection)));
    }
    if connection.ends_with(".jsonl") {
        return Ok(BackendKind::Document(PathBuf::from(connection)));
    }

    Err(ConfigError::UnsupportedBackend(connection.to_string()))
}

fn non_empty_path(connection: &str, rest: &str) -> ConfigResult<PathBuf> {
    if rest.is_empty() {
        return Err(ConfigError::UnsupportedBackend(format!(
            "{} (missing path)",
            connection
        )));
    }
    Ok(PathBuf::from(rest))
}

/// Builds an unconnected sink for the connection string
pub fn open_sink(connection: &str) -> ConfigResult<Box<dyn Sink>> {
    let sink: Box<dyn Sink> = match determine_backend(connection)? {
        BackendKind::Sqlite(path) => {
            tracing::debug!("Using SQLite backend at {}", path.display());
            Box::new(SqliteSink::new(path))
        }
        BackendKind::Document(path) => {
            tracing::debug!("Using document backend at {}", path.display());
            Box::new(DocumentSink::new(path))
        }
    };
    Ok(sink)
}

/// Owns a sink for the duration of a run
///
/// The sink is closed when the session is dropped, whether the run returned
/// normally, failed, or unwound.
pub struct SinkSession {
    sink: Box<dyn Sink>,
}

impl SinkSession {
    pub fn new(sink: Box<dyn Sink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &dyn Sink {
        self.sink.as_ref()
    }

    pub fn sink_mut(&mut self) -> &mut dyn Sink {
        self.sink.as_mut()
    }
}

impl Drop for SinkSession {
    fn drop(&mut self) {
        if let Err(e) = self.sink.close() {
            tracing::error!("Failed to close storage: {}", e);
        } else {
            tracing::debug!("Storage closed");
        }
    }
}
