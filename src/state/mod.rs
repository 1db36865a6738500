//! State module for per-video results
//!
//! # Components
//!
//! - `VideoOutcome`: what happened to one video (found, none found, skipped, failed)
//! - `VideoRecord`: the immutable result row produced for every video

mod outcome;
mod record;

// Re-export main types
pub use outcome::VideoOutcome;
pub use record::{VideoRecord, UNAVAILABLE_TITLE, UNKNOWN_TITLE};
