//! Document storage implementation
//!
//! Stores one JSON document per category, embedding its clues, appended as a
//! line to a file:
//!
//! ```text
//! {"category":"TREES","clues":[{"question":"...","answer":"...","value":200}],"scraped_at":"..."}
//! ```

use crate::board::{Board, Clue};
use crate::storage::traits::{Sink, SinkStatus, StorageError, StorageResult, StoreTotals};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One stored category
#[derive(Debug, Serialize)]
struct CategoryDocument<'a> {
    category: &'a str,
    clues: &'a [Clue],
    scraped_at: String,
}

/// The parts of a stored document needed for counting
#[derive(Debug, Deserialize)]
struct CountedDocument {
    clues: Vec<serde_json::Value>,
}

/// JSON-lines document store
pub struct DocumentSink {
    path: PathBuf,
    writer: Option<File>,
    status: SinkStatus,
}

impl DocumentSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            status: SinkStatus::NotConnected,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for DocumentSink {
    fn init_connection(&mut self) -> StorageResult<()> {
        if !self.path.exists() {
            tracing::info!("Creating new document file: {}", self.path.display());
        }

        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(file) => {
                self.writer = Some(file);
                self.status = SinkStatus::Connected;
                Ok(())
            }
            Err(e) => {
                self.status = SinkStatus::Failed;
                Err(StorageError::Connection(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        }
    }

    fn status(&self) -> SinkStatus {
        self.status
    }

    fn save(&mut self, board: &Board) -> StorageResult<()> {
        let writer = self.writer.as_mut().ok_or(StorageError::NotConnected)?;
        let scraped_at = Utc::now().to_rfc3339();

        // Encoded in full first so a failed save leaves no partial board behind
        let mut buffer = Vec::new();
        for category in board {
            let document = CategoryDocument {
                category: &category.title,
                clues: &category.clues,
                scraped_at: scraped_at.clone(),
            };
            serde_json::to_writer(&mut buffer, &document)?;
            buffer.push(b'\n');
        }

        writer.write_all(&buffer)?;
        writer.flush()?;

        Ok(())
    }

    fn totals(&self) -> StorageResult<StoreTotals> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreTotals::default())
            }
            Err(e) => return Err(e.into()),
        };

        let mut totals = StoreTotals::default();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let document: CountedDocument = serde_json::from_str(&line)?;
            totals.categories += 1;
            totals.clues += document.clues.len() as u64;
        }
        Ok(totals)
    }

    fn close(&mut self) -> StorageResult<()> {
        if let Some(mut writer) = self.writer.take() {
            self.status = SinkStatus::NotConnected;
            writer.flush()?;
        }
        Ok(())
    }
}
