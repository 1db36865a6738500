use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for the extractor
///
/// Every section has defaults, so an empty file (or no file at all) is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub platform: PlatformConfig,
    pub output: OutputConfig,
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Number of videos processed concurrently
    pub workers: usize,

    /// Number of videos per scheduling round
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Pause between batches (milliseconds)
    #[serde(rename = "batch-delay-ms")]
    pub batch_delay_ms: u64,

    /// Upper bound on a single video fetch (seconds)
    #[serde(rename = "video-timeout-secs")]
    pub video_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            batch_size: 50,
            batch_delay_ms: 2000,
            video_timeout_secs: 60,
        }
    }
}

impl ExtractorConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn video_timeout(&self) -> Duration {
        Duration::from_secs(self.video_timeout_secs)
    }
}

/// Which video platform client to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PlatformBackend {
    /// Shell out to the yt-dlp executable
    #[default]
    #[serde(rename = "yt-dlp")]
    YtDlp,

    /// Query the YouTube Data API v3 (needs an API key)
    #[serde(rename = "data-api")]
    DataApi,
}

/// Video platform client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub backend: PlatformBackend,

    /// Path or name of the yt-dlp executable
    #[serde(rename = "ytdlp-path")]
    pub ytdlp_path: String,

    /// Network timeout handed to the client (seconds)
    #[serde(rename = "socket-timeout-secs")]
    pub socket_timeout_secs: u64,

    /// Retries the client performs on transient failures
    pub retries: u32,

    /// Delay between retries (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// YouTube Data API key
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    /// YouTube Data API base URL
    #[serde(rename = "api-base-url")]
    pub api_base_url: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            backend: PlatformBackend::YtDlp,
            ytdlp_path: "yt-dlp".to_string(),
            socket_timeout_secs: 30,
            retries: 3,
            retry_delay_ms: 5000,
            api_key: None,
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
        }
    }
}

impl PlatformConfig {
    pub fn socket_timeout(&self) -> Duration {
        Duration::from_secs(self.socket_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Separator placed between links inside the Bandcamp Links column
    #[serde(rename = "link-delimiter")]
    pub link_delimiter: String,

    /// Path to the append-mode run log
    #[serde(rename = "log-path")]
    pub log_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            link_delimiter: "; ".to_string(),
            log_path: "bandcamp_extractor.log".to_string(),
        }
    }
}
