//! Bandcamp Extractor: pulls Bandcamp links out of YouTube playlist descriptions
//!
//! This crate resolves a playlist into its videos, fetches every video's
//! description with bounded parallelism, scans the descriptions for Bandcamp
//! URLs and appends one CSV row per video as results arrive.

pub mod config;
pub mod extractor;
pub mod links;
pub mod output;
pub mod platform;
pub mod state;

use thiserror::Error;

/// Main error type for run-level failures
///
/// Per-video problems never surface here; they are recorded in the
/// video's [`state::VideoOutcome`] instead.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Playlist resolution failed: {0}")]
    PlaylistResolution(#[from] PlaylistResolutionError),

    #[error("Cannot open output {path}: {source}")]
    Output {
        path: String,
        source: std::io::Error,
    },

    #[error("Platform setup error: {0}")]
    Platform(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while turning a playlist URL into a list of videos
///
/// This is the only error that aborts a run before any video is processed.
#[derive(Debug, Error)]
pub enum PlaylistResolutionError {
    #[error("Malformed playlist URL: {0}")]
    InvalidUrl(String),

    #[error("URL has no playlist identifier: {0}")]
    MissingPlaylistId(String),

    #[error("Playlist not found: {0}")]
    NotFound(String),

    #[error("Playlist is inaccessible: {0}")]
    Inaccessible(String),

    #[error("Platform backend error: {0}")]
    Backend(String),
}

/// Errors raised while fetching one video's metadata
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Video unavailable: {0}")]
    Unavailable(platform::UnavailableReason),

    #[error("Network error: {0}")]
    Network(String),
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
}

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extractor::{BatchScheduler, ExtractionRun, RecordSink, VideoProcessor};
pub use links::extract_bandcamp_links;
pub use output::{ResultSink, RunCounters};
pub use platform::{VideoDetails, VideoPlatform, VideoRef};
pub use state::{VideoOutcome, VideoRecord};
