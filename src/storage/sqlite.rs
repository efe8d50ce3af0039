//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Sink trait.
//! Each board is written in a single transaction: one `categories` row per
//! category and one `clues` row per clue.

use crate::board::Board;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Sink, SinkStatus, StorageError, StorageResult, StoreTotals};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite storage backend
pub struct SqliteSink {
    location: Location,
    conn: Option<Connection>,
    status: SinkStatus,
}

impl SqliteSink {
    /// Creates a sink for the database file at `path`
    ///
    /// Nothing is opened until `init_connection` is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: None,
            status: SinkStatus::NotConnected,
        }
    }

    /// Creates a sink backed by an in-memory database (for testing)
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: None,
            status: SinkStatus::NotConnected,
        }
    }

    /// Path of the database file, if file-backed
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path.as_path()),
            Location::Memory => None,
        }
    }

    fn open(&self) -> StorageResult<Connection> {
        let conn = match &self.location {
            Location::File(path) => {
                if !path.exists() {
                    tracing::info!("Creating new database file: {}", path.display());
                }
                let conn = Connection::open(path)?;
                // Configure SQLite for better performance
                conn.execute_batch(
                    "
                    PRAGMA journal_mode = WAL;
                    PRAGMA synchronous = NORMAL;
                    PRAGMA foreign_keys = ON;
                ",
                )?;
                conn
            }
            Location::Memory => {
                let conn = Connection::open_in_memory()?;
                conn.execute_batch("PRAGMA foreign_keys = ON;")?;
                conn
            }
        };

        initialize_schema(&conn)?;
        Ok(conn)
    }

    fn conn(&self) -> StorageResult<&Connection> {
        self.conn.as_ref().ok_or(StorageError::NotConnected)
    }
}

impl Sink for SqliteSink {
    fn init_connection(&mut self) -> StorageResult<()> {
        match self.open() {
            Ok(conn) => {
                self.conn = Some(conn);
                self.status = SinkStatus::Connected;
                Ok(())
            }
            Err(e) => {
                self.status = SinkStatus::Failed;
                Err(StorageError::Connection(e.to_string()))
            }
        }
    }

    fn status(&self) -> SinkStatus {
        self.status
    }

    fn save(&mut self, board: &Board) -> StorageResult<()> {
        let conn = self.conn.as_mut().ok_or(StorageError::NotConnected)?;
        let now = Utc::now().to_rfc3339();

        let tx = conn.transaction()?;
        for category in board {
            tx.execute(
                "INSERT INTO categories (title, scraped_at) VALUES (?1, ?2)",
                params![category.title, now],
            )?;
            let category_id = tx.last_insert_rowid();

            for clue in &category.clues {
                tx.execute(
                    "INSERT INTO clues (question, answer, value, category) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        clue.question,
                        clue.answer,
                        clue.value.map(|v| v.to_db_string()),
                        category_id
                    ],
                )?;
            }
        }
        tx.commit()?;

        tracing::debug!(categories = board.len(), "Saved board");
        Ok(())
    }

    fn totals(&self) -> StorageResult<StoreTotals> {
        let conn = self.conn()?;
        let categories: i64 =
            conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        let clues: i64 = conn.query_row("SELECT COUNT(*) FROM clues", [], |row| row.get(0))?;

        Ok(StoreTotals {
            categories: categories as u64,
            clues: clues as u64,
        })
    }

    fn close(&mut self) -> StorageResult<()> {
        if let Some(conn) = self.conn.take() {
            self.status = SinkStatus::NotConnected;
            conn.close().map_err(|(_, e)| StorageError::Sqlite(e))?;
        }
        Ok(())
    }
}
