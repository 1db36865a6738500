//! yt-dlp client
//!
//! Resolves playlists and fetches video metadata by running the `yt-dlp`
//! executable and reading its JSON output. Retries are delegated to yt-dlp
//! itself through `--retries`.

use super::diagnostics::{classify_fetch_error, classify_playlist_error};
use super::playlist::{parse_playlist_id, video_url};
use super::{VideoDetails, VideoPlatform, VideoRef};
use crate::config::PlatformConfig;
use crate::{FetchError, PlaylistResolutionError};
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct FlatPlaylist {
    #[serde(default)]
    entries: Vec<Option<FlatEntry>>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    id: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoInfo {
    title: Option<String>,
    description: Option<String>,
}

/// Platform client backed by the yt-dlp executable
#[derive(Debug, Clone)]
pub struct YtDlpPlatform {
    executable: String,
    socket_timeout: Duration,
    retries: u32,
}

impl YtDlpPlatform {
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            executable: config.ytdlp_path.clone(),
            socket_timeout: config.socket_timeout(),
            retries: config.retries,
        }
    }

    /// Runs yt-dlp with the shared flags plus `args`
    ///
    /// Returns stdout on success and the captured stderr (or launch error) on failure.
    async fn run(&self, args: &[&str]) -> Result<String, String> {
        let mut command = Command::new(&self.executable);
        command
            .arg("--ignore-config")
            .arg("--no-warnings")
            .arg("--socket-timeout")
            .arg(self.socket_timeout.as_secs().to_string())
            .arg("--retries")
            .arg(self.retries.to_string())
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::trace!("Running {} {:?}", self.executable, args);

        let output = command
            .output()
            .await
            .map_err(|e| format!("failed to launch {}: {}", self.executable, e))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            if stderr.trim().is_empty() {
                Err(format!("{} exited with {}", self.executable, output.status))
            } else {
                Err(stderr)
            }
        }
    }
}

#[async_trait]
impl VideoPlatform for YtDlpPlatform {
    async fn resolve_playlist(&self, url: &str) -> Result<Vec<VideoRef>, PlaylistResolutionError> {
        let playlist_id = parse_playlist_id(url)?;
        let playlist_url = format!("https://www.youtube.com/playlist?list={}", playlist_id);

        let stdout = self
            .run(&["--flat-playlist", "--dump-single-json", &playlist_url])
            .await
            .map_err(|stderr| classify_playlist_error(&stderr))?;

        parse_playlist_json(&stdout)
    }

    async fn fetch_description(&self, identifier: &str) -> Result<VideoDetails, FetchError> {
        let url = video_url(identifier);

        let stdout = self
            .run(&["--dump-json", "--skip-download", &url])
            .await
            .map_err(|stderr| classify_fetch_error(&stderr))?;

        parse_video_json(&stdout)
    }
}

/// Parses `--flat-playlist --dump-single-json` output into ordered video refs
///
/// Entries without an identifier are dropped; positions are assigned after
/// filtering so they stay contiguous.
pub(crate) fn parse_playlist_json(json: &str) -> Result<Vec<VideoRef>, PlaylistResolutionError> {
    let playlist: FlatPlaylist = serde_json::from_str(json).map_err(|e| {
        PlaylistResolutionError::Backend(format!("unreadable playlist listing: {}", e))
    })?;

    Ok(playlist
        .entries
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.id.filter(|id| !id.is_empty()).map(|id| (id, entry.title)))
        .enumerate()
        .map(|(position, (id, title))| VideoRef::new(id, position).with_title_hint(title))
        .collect())
}

/// Parses `--dump-json` output for a single video
pub(crate) fn parse_video_json(json: &str) -> Result<VideoDetails, FetchError> {
    let info: VideoInfo = serde_json::from_str(json.trim())
        .map_err(|e| FetchError::Network(format!("unreadable video metadata: {}", e)))?;

    Ok(VideoDetails {
        title: info.title.unwrap_or_else(|| "Unknown Title".to_string()),
        description: info.description.unwrap_or_default(),
    })
}
