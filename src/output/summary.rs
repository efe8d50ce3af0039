//! End-of-run summary
//!
//! Combines the producer, worker and collector reports into the counts shown
//! to the user once the pipeline has drained.

use crate::crawler::{CollectorReport, ProducerReport, WorkerReport};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Totals for one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Seasons whose listings produced game URLs
    pub seasons_visited: u32,

    /// Game URLs put on the work queue
    pub urls_queued: usize,

    /// Game pages fetched successfully
    pub pages_fetched: u64,

    /// Game pages dropped after a transport failure
    pub transport_failures: u64,

    /// Fetched pages that yielded no categories
    pub empty_pages: u64,

    /// Boards the sink accepted
    pub boards_saved: u64,

    /// Boards lost to sink errors
    pub save_failures: u64,

    /// Categories stored
    pub categories: u64,

    /// Clues stored
    pub clues: u64,

    /// Wall-clock time of the pipeline
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn from_reports(
        producer: &ProducerReport,
        workers: &WorkerReport,
        collector: &CollectorReport,
        elapsed: Duration,
    ) -> Self {
        Self {
            seasons_visited: producer.seasons_visited,
            urls_queued: producer.urls_queued,
            pages_fetched: workers.pages_fetched,
            transport_failures: workers.transport_failures,
            empty_pages: workers.empty_pages,
            boards_saved: collector.boards_saved,
            save_failures: collector.save_failures,
            categories: collector.categories,
            clues: collector.clues,
            elapsed,
        }
    }

    /// The one-line result always printed at the end of a run
    pub fn headline(&self) -> String {
        format!(
            "{} categories and {} clues were collected",
            self.categories, self.clues
        )
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Scrape Summary ===")?;
        writeln!(f)?;
        writeln!(f, "Discovery:")?;
        writeln!(f, "  Seasons visited: {}", self.seasons_visited)?;
        writeln!(f, "  Game URLs queued: {}", self.urls_queued)?;
        writeln!(f)?;
        writeln!(f, "Pages:")?;
        writeln!(f, "  Fetched: {}", self.pages_fetched)?;
        writeln!(f, "  Transport failures: {}", self.transport_failures)?;
        writeln!(f, "  Without categories: {}", self.empty_pages)?;
        writeln!(f)?;
        writeln!(f, "Storage:")?;
        writeln!(f, "  Boards saved: {}", self.boards_saved)?;
        writeln!(f, "  Save failures: {}", self.save_failures)?;
        writeln!(f)?;
        writeln!(f, "Elapsed: {:.1}s", self.elapsed.as_secs_f64())?;
        write!(f, "{}", self.headline())
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("{}", summary);
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }
}
