//! Per-video processing
//!
//! Fetches one video's description, scans it for Bandcamp links and turns
//! every possible result into a [`VideoRecord`]. Nothing here returns an
//! error: restricted videos become `Skipped`, transient failures and
//! timeouts become `Failed`.

use crate::links::extract_bandcamp_links;
use crate::platform::{VideoPlatform, VideoRef};
use crate::state::VideoRecord;
use crate::FetchError;
use std::sync::Arc;
use std::time::Duration;

/// Processes single videos against a shared platform client
#[derive(Clone)]
pub struct VideoProcessor {
    platform: Arc<dyn VideoPlatform>,
    timeout: Duration,
}

impl VideoProcessor {
    /// Creates a processor
    ///
    /// `timeout` bounds each call to the platform, including the platform's own retries.
    pub fn new(platform: Arc<dyn VideoPlatform>, timeout: Duration) -> Self {
        Self { platform, timeout }
    }

    /// Produces the record for one video
    ///
    /// | Platform result | Outcome |
    /// |-----------------|---------|
    /// | Details with Bandcamp links | `Found` |
    /// | Details without links | `NoneFound` |
    /// | `FetchError::Unavailable` | `Skipped(reason)`, title "Unavailable" |
    /// | `FetchError::Network` | `Failed(message)` |
    /// | No answer within the timeout | `Failed("timed out ...")` |
    pub async fn process(&self, video: &VideoRef) -> VideoRecord {
        let fetch = self.platform.fetch_description(&video.identifier);

        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(details)) => {
                let links = extract_bandcamp_links(&details.description);
                VideoRecord::read(video, details.title, links)
            }
            Ok(Err(FetchError::Unavailable(reason))) => VideoRecord::skipped(video, reason),
            Ok(Err(FetchError::Network(message))) => VideoRecord::failed(video, message),
            Err(_) => VideoRecord::failed(
                video,
                format!("timed out after {}s", self.timeout.as_secs_f64()),
            ),
        }
    }
}
