//! Output module for run summaries and store statistics
//!
//! This module handles:
//! - Building the end-of-run summary from the pipeline reports
//! - Reading totals back from an existing store

pub mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, StoreStatistics};
pub use summary::{print_summary, RunSummary};
