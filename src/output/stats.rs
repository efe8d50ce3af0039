//! Statistics of an existing store
//!
//! Used by `--stats` to report what a previous run left behind without
//! crawling anything.

use crate::storage::{Sink, StorageResult};

/// Stored totals
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStatistics {
    /// Categories in the store
    pub categories: u64,

    /// Clues in the store
    pub clues: u64,
}

impl StoreStatistics {
    /// Average clues per category, 0 for an empty store
    pub fn clues_per_category(&self) -> f64 {
        if self.categories == 0 {
            0.0
        } else {
            self.clues as f64 / self.categories as f64
        }
    }
}

/// Loads statistics from a connected sink
pub fn load_statistics(sink: &dyn Sink) -> StorageResult<StoreStatistics> {
    let totals = sink.totals()?;
    Ok(StoreStatistics {
        categories: totals.categories,
        clues: totals.clues,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");
    println!("  Categories: {}", stats.categories);
    println!("  Clues: {}", stats.clues);
    println!("  Clues per category: {:.2}", stats.clues_per_category());
}
