use crate::crawler::DEFAULT_POLL_INTERVAL;
use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Main configuration structure for the scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// The archive root as a URL with a trailing slash
    pub fn base_url(&self) -> ConfigResult<Url> {
        let mut raw = self.crawler.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", raw, e)))
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Root of the archive; landing page and season listings live under it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of concurrent workers fetching game pages
    pub workers: usize,

    /// Capacity of the work queue between producer and workers
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: usize,

    /// Capacity of the output channel between workers and collector
    #[serde(rename = "output-capacity")]
    pub output_capacity: usize,

    /// How long the collector waits for output before checking workers (milliseconds)
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Whole-request timeout for page fetches (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl CrawlerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://j-archive.com".to_string(),
            workers: 7,
            queue_capacity: 256,
            output_capacity: 64,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/jarchive-scraper".to_string(),
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Connection string; its prefix or extension selects the backend
    pub connection: String,

    /// Readiness checks before giving up on the backend
    #[serde(rename = "connect-attempts")]
    pub connect_attempts: u32,

    /// Delay between readiness checks (milliseconds)
    #[serde(rename = "connect-interval-ms")]
    pub connect_interval_ms: u64,
}

impl StorageConfig {
    pub fn connect_interval(&self) -> Duration {
        Duration::from_millis(self.connect_interval_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection: "sqlite:///jarchive.db".to_string(),
            connect_attempts: 10,
            connect_interval_ms: 1000,
        }
    }
}
