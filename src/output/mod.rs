//! Output module for persisting results
//!
//! This module handles:
//! - Incremental, flush-per-row CSV writing
//! - Run counters and the final summary
//! - Default output file naming

mod csv_sink;
pub mod stats;

pub use csv_sink::{ResultSink, CSV_HEADER};
pub use stats::{print_summary, RunCounters};

use std::path::PathBuf;

/// Default CSV path for a playlist when `--output` is not given
///
/// # Example
///
/// ```
/// use bandcamp_extractor::output::default_output_path;
///
/// assert_eq!(
///     default_output_path("PL123").to_str(),
///     Some("PL123_bandcamp_links.csv")
/// );
/// ```
pub fn default_output_path(playlist_id: &str) -> PathBuf {
    PathBuf::from(format!("{}_bandcamp_links.csv", playlist_id))
}
