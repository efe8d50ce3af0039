//! jarchive-scraper: a concurrent trivia archive crawler
//!
//! This crate walks the season listings of a trivia-game archive, fetches each
//! game page with a bounded pool of workers, extracts the category/clue grid
//! from every round and hands the resulting boards to a single storage writer.

pub mod board;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unable to determine the current season: {0}")]
    SeasonDiscovery(String),

    #[error("Storage backend did not become ready after {attempts} attempts")]
    SinkTimeout { attempts: u32 },

    #[error("Storage backend reported a failed connection")]
    SinkFailed,

    #[error("Pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unsupported storage connection string: {0}")]
    UnsupportedBackend(String),
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use board::{Board, Category, Clue, ClueValue};
pub use config::Config;
pub use crawler::{run_scrape, Coordinator, CrawlPlan, HttpFetcher, PageFetcher};
pub use extract::extract_board;
pub use output::RunSummary;
pub use storage::{open_sink, Sink, SinkSession, SinkStatus};
