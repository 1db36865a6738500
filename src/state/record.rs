use super::VideoOutcome;
use crate::platform::{UnavailableReason, VideoRef};

/// Title written for videos whose metadata could not be read because they are restricted
pub const UNAVAILABLE_TITLE: &str = "Unavailable";

/// Title written for failed videos when the playlist listing had no title either
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Result of processing one video
///
/// Constructed only through the associated functions so that
/// `bandcamp_links` is non-empty exactly when the outcome is `Found`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub title: String,
    pub url: String,
    pub position: usize,
    bandcamp_links: Vec<String>,
    outcome: VideoOutcome,
}

impl VideoRecord {
    /// Record for a video whose description was read
    ///
    /// The outcome is `Found` when `links` is non-empty, `NoneFound` otherwise.
    pub fn read(video: &VideoRef, title: String, links: Vec<String>) -> Self {
        let outcome = if links.is_empty() {
            VideoOutcome::NoneFound
        } else {
            VideoOutcome::Found
        };

        Self {
            title,
            url: video.url(),
            position: video.position,
            bandcamp_links: links,
            outcome,
        }
    }

    /// Record for a restricted video
    pub fn skipped(video: &VideoRef, reason: UnavailableReason) -> Self {
        Self {
            title: UNAVAILABLE_TITLE.to_string(),
            url: video.url(),
            position: video.position,
            bandcamp_links: Vec::new(),
            outcome: VideoOutcome::Skipped(reason),
        }
    }

    /// Record for a video that could not be fetched
    pub fn failed(video: &VideoRef, reason: impl Into<String>) -> Self {
        Self {
            title: video
                .title_hint
                .clone()
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            url: video.url(),
            position: video.position,
            bandcamp_links: Vec::new(),
            outcome: VideoOutcome::Failed(reason.into()),
        }
    }

    pub fn bandcamp_links(&self) -> &[String] {
        &self.bandcamp_links
    }

    pub fn outcome(&self) -> &VideoOutcome {
        &self.outcome
    }

    /// Links joined into a single CSV field
    pub fn joined_links(&self, delimiter: &str) -> String {
        self.bandcamp_links.join(delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> VideoRef {
        VideoRef::new("abc", 7).with_title_hint(Some("Listed Title".to_string()))
    }

    #[test]
    fn test_read_with_links_is_found() {
        let record = VideoRecord::read(
            &video(),
            "Real Title".to_string(),
            vec!["https://a.bandcamp.com/album/x".to_string()],
        );
        assert_eq!(record.outcome(), &VideoOutcome::Found);
        assert_eq!(record.url, "https://www.youtube.com/watch?v=abc");
        assert_eq!(record.position, 7);
        assert_eq!(record.bandcamp_links().len(), 1);
    }

    #[test]
    fn test_read_without_links_is_none_found() {
        let record = VideoRecord::read(&video(), "Real Title".to_string(), vec![]);
        assert_eq!(record.outcome(), &VideoOutcome::NoneFound);
        assert!(record.bandcamp_links().is_empty());
        assert_eq!(record.joined_links("; "), "");
    }

    #[test]
    fn test_skipped_uses_sentinel_title() {
        let record = VideoRecord::skipped(&video(), UnavailableReason::Private);
        assert_eq!(record.title, UNAVAILABLE_TITLE);
        assert!(record.bandcamp_links().is_empty());
        assert!(record.outcome().is_skipped());
    }

    #[test]
    fn test_failed_keeps_title_hint() {
        let record = VideoRecord::failed(&video(), "timed out");
        assert_eq!(record.title, "Listed Title");
        assert_eq!(record.outcome(), &VideoOutcome::Failed("timed out".to_string()));

        let bare = VideoRecord::failed(&VideoRef::new("zzz", 0), "boom");
        assert_eq!(bare.title, UNKNOWN_TITLE);
    }

    #[test]
    fn test_joined_links() {
        let record = VideoRecord::read(
            &video(),
            "t".to_string(),
            vec![
                "https://a.bandcamp.com/album/x".to_string(),
                "https://b.bandcamp.com/track/y".to_string(),
            ],
        );
        assert_eq!(
            record.joined_links("; "),
            "https://a.bandcamp.com/album/x; https://b.bandcamp.com/track/y"
        );
    }
}
