//! Video platform module
//!
//! This module is the boundary to YouTube. It contains:
//! - The [`VideoPlatform`] trait the pipeline consumes
//! - Playlist URL parsing
//! - Classification of platform error messages
//! - Two clients: yt-dlp (subprocess) and the YouTube Data API (HTTP)

mod data_api;
mod diagnostics;
mod playlist;
mod ytdlp;

pub use data_api::DataApiPlatform;
pub use diagnostics::{classify_fetch_error, classify_playlist_error};
pub use playlist::{parse_playlist_id, video_url};
pub use ytdlp::YtDlpPlatform;

use crate::config::{PlatformBackend, PlatformConfig};
use crate::{ExtractorError, FetchError, PlaylistResolutionError};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A video's place in a resolved playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    /// Platform video identifier
    pub identifier: String,

    /// 0-based order in the playlist
    pub position: usize,

    /// Title reported by the playlist listing, if any
    pub title_hint: Option<String>,
}

impl VideoRef {
    pub fn new(identifier: impl Into<String>, position: usize) -> Self {
        Self {
            identifier: identifier.into(),
            position,
            title_hint: None,
        }
    }

    pub fn with_title_hint(mut self, title: Option<String>) -> Self {
        self.title_hint = title.filter(|t| !t.trim().is_empty());
        self
    }

    /// Watch URL for this video
    pub fn url(&self) -> String {
        video_url(&self.identifier)
    }
}

/// Title and description fetched for one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
}

/// Why a video cannot be read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnavailableReason {
    AgeRestricted,
    Private,
    CopyrightBlocked,
    Deleted,
    /// Unavailable for a reason the platform did not name precisely
    Other(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AgeRestricted => write!(f, "age-restricted"),
            Self::Private => write!(f, "private"),
            Self::CopyrightBlocked => write!(f, "copyright-blocked"),
            Self::Deleted => write!(f, "deleted"),
            Self::Other(detail) => write!(f, "unavailable ({})", detail),
        }
    }
}

/// Client for the video platform
///
/// Implementations must be safe to share across workers. Any retry policy
/// belongs to the implementation; callers never retry.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Resolves a playlist URL into its videos, in playlist order
    async fn resolve_playlist(&self, url: &str) -> Result<Vec<VideoRef>, PlaylistResolutionError>;

    /// Fetches the title and description of one video
    async fn fetch_description(&self, identifier: &str) -> Result<VideoDetails, FetchError>;
}

/// Builds the platform client selected by the configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn VideoPlatform>)` - The yt-dlp or Data API client, ready to share across workers
/// * `Err(ExtractorError::Platform)` - The HTTP client could not be built
pub fn build_platform(config: &PlatformConfig) -> Result<Arc<dyn VideoPlatform>, ExtractorError> {
    match config.backend {
        PlatformBackend::YtDlp => Ok(Arc::new(YtDlpPlatform::new(config))),
        PlatformBackend::DataApi => {
            let platform = DataApiPlatform::new(config)
                .map_err(|e| ExtractorError::Platform(e.to_string()))?;
            Ok(Arc::new(platform))
        }
    }
}
