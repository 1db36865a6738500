//! Run counters and summary display
//!
//! Counters are owned by the result sink and handed out as copies; there is
//! no process-wide state, so independent runs (and tests) never interfere.

use crate::state::VideoOutcome;
use std::fmt;
use std::time::Duration;

/// Running totals for one extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Number of videos in the resolved playlist
    pub total: usize,

    /// Records accepted so far
    pub processed: usize,

    /// Records with at least one Bandcamp link
    pub found: usize,

    /// Records read successfully without links
    pub not_found: usize,

    /// Restricted videos
    pub skipped: usize,

    /// Videos that could not be fetched
    pub failed: usize,

    /// Records counted but not written to the CSV
    pub unpersisted: usize,
}

impl RunCounters {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Counts one record
    pub fn record(&mut self, outcome: &VideoOutcome) {
        self.processed += 1;
        match outcome {
            VideoOutcome::Found => self.found += 1,
            VideoOutcome::NoneFound => self.not_found += 1,
            VideoOutcome::Skipped(_) => self.skipped += 1,
            VideoOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Videos not yet processed
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.processed)
    }

    /// True when every processed record falls in exactly one outcome bucket
    pub fn is_consistent(&self) -> bool {
        self.processed == self.found + self.not_found + self.skipped + self.failed
    }

    /// True once every video in the playlist has been processed
    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}

impl fmt::Display for RunCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {}/{}, found {}, no links {}, skipped {}, failed {}",
            self.processed, self.total, self.found, self.not_found, self.skipped, self.failed
        )?;
        if self.unpersisted > 0 {
            write!(f, ", unsaved rows {}", self.unpersisted)?;
        }
        Ok(())
    }
}

/// Prints the run summary to stdout in a formatted manner
pub fn print_summary(counters: &RunCounters, elapsed: Duration, output_path: &str) {
    println!("=== Extraction Summary ===\n");

    println!("Videos:");
    println!("  Total in playlist: {}", counters.total);
    println!("  Processed: {}", counters.processed);
    println!("  With Bandcamp links: {}", counters.found);
    println!("  Without links: {}", counters.not_found);
    println!("  Skipped (restricted): {}", counters.skipped);
    println!("  Failed: {}", counters.failed);
    if counters.unpersisted > 0 {
        println!("  Rows that could not be saved: {}", counters.unpersisted);
    }
    println!();

    let hit_rate = if counters.processed > 0 {
        (counters.found as f64 / counters.processed as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Hit Rate: {:.1}% ({} / {} videos had Bandcamp links)",
        hit_rate, counters.found, counters.processed
    );
    println!("Elapsed: {:.1}s", elapsed.as_secs_f64());
    println!("Output: {}", output_path);
}
