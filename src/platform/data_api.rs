//! YouTube Data API v3 client
//!
//! Resolves playlists through `playlistItems` (paged, 50 per page) and reads
//! video metadata through `videos`. Transient failures (timeouts, connection
//! errors, HTTP 429 and 5xx) are retried with a fixed delay.
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 5xx | Retry up to `retries` times |
//! | HTTP 429 | Retry up to `retries` times |
//! | Timeout / connect error | Retry up to `retries` times |
//! | Other HTTP errors | Immediate failure |

use super::playlist::parse_playlist_id;
use super::{UnavailableReason, VideoDetails, VideoPlatform, VideoRef};
use crate::config::PlatformConfig;
use crate::{FetchError, PlaylistResolutionError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const PAGE_SIZE: &str = "50";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    snippet: Option<ItemSnippet>,
    content_details: Option<ItemContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ItemSnippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemContentDetails {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosPage {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Option<VideoSnippet>,
    status: Option<VideoStatus>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatus {
    privacy_status: Option<String>,
    upload_status: Option<String>,
    rejection_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Why an API call did not produce a body
#[derive(Debug)]
enum ApiFailure {
    /// The server answered with a non-success status
    Status { status: StatusCode, message: String },
    /// The request never completed or the body was unreadable
    Transport(String),
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { status, message } => write!(f, "HTTP {}: {}", status.as_u16(), message),
            Self::Transport(message) => write!(f, "{}", message),
        }
    }
}

/// Platform client backed by the YouTube Data API
#[derive(Debug, Clone)]
pub struct DataApiPlatform {
    client: Client,
    base_url: String,
    api_key: String,
    retries: u32,
    retry_delay: Duration,
}

impl DataApiPlatform {
    /// Builds the client and its HTTP connection pool
    pub fn new(config: &PlatformConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("bandcamp-extractor/", env!("CARGO_PKG_VERSION")))
            .timeout(config.socket_timeout())
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
            retries: config.retries,
            retry_delay: config.retry_delay(),
        })
    }

    /// Sends a GET request, retrying transient failures
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiFailure> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut attempt = 0;

        loop {
            match self.get_once(&url, query).await {
                Ok(body) => return Ok(body),
                Err((failure, transient)) => {
                    if !transient || attempt >= self.retries {
                        return Err(failure);
                    }
                    attempt += 1;
                    tracing::debug!(
                        "Retrying {} ({}/{}) after: {}",
                        endpoint,
                        attempt,
                        self.retries,
                        failure
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    /// One request attempt; the flag tells whether the failure is worth retrying
    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, (ApiFailure, bool)> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                let transient = e.is_timeout() || e.is_connect() || e.is_request();
                (ApiFailure::Transport(e.without_url().to_string()), transient)
            })?;

        let status = response.status();
        if !status.is_success() {
            let transient = status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err((ApiFailure::Status { status, message }, transient));
        }

        response.json::<T>().await.map_err(|e| {
            (
                ApiFailure::Transport(format!("unreadable response: {}", e.without_url())),
                false,
            )
        })
    }
}

#[async_trait]
impl VideoPlatform for DataApiPlatform {
    async fn resolve_playlist(&self, url: &str) -> Result<Vec<VideoRef>, PlaylistResolutionError> {
        let playlist_id = parse_playlist_id(url)?;
        let mut refs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("part", "snippet,contentDetails"),
                ("playlistId", playlist_id.as_str()),
                ("maxResults", PAGE_SIZE),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: PlaylistItemsPage = self
                .get_json("playlistItems", &query)
                .await
                .map_err(|failure| playlist_failure(&playlist_id, failure))?;

            for item in page.items {
                let Some(video_id) = item.content_details.and_then(|d| d.video_id) else {
                    continue;
                };
                let title = item.snippet.and_then(|s| s.title);
                let position = refs.len();
                refs.push(VideoRef::new(video_id, position).with_title_hint(title));
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("Resolved playlist {} to {} videos", playlist_id, refs.len());
        Ok(refs)
    }

    async fn fetch_description(&self, identifier: &str) -> Result<VideoDetails, FetchError> {
        let page: VideosPage = self
            .get_json("videos", &[("part", "snippet,status"), ("id", identifier)])
            .await
            .map_err(|failure| FetchError::Network(failure.to_string()))?;

        let Some(item) = page.items.into_iter().next() else {
            // The API omits deleted videos and other users' private videos alike
            return Err(FetchError::Unavailable(UnavailableReason::Deleted));
        };

        if let Some(status) = &item.status {
            if let Some(reason) = unavailable_reason(status) {
                return Err(FetchError::Unavailable(reason));
            }
        }

        let snippet = item.snippet.ok_or_else(|| {
            FetchError::Network(format!("no snippet returned for video {}", identifier))
        })?;

        Ok(VideoDetails {
            title: snippet.title.unwrap_or_else(|| "Unknown Title".to_string()),
            description: snippet.description.unwrap_or_default(),
        })
    }
}

fn playlist_failure(playlist_id: &str, failure: ApiFailure) -> PlaylistResolutionError {
    match failure {
        ApiFailure::Status { status, message } if status == StatusCode::NOT_FOUND => {
            PlaylistResolutionError::NotFound(format!("{}: {}", playlist_id, message))
        }
        ApiFailure::Status { status, message }
            if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED =>
        {
            PlaylistResolutionError::Inaccessible(format!("{}: {}", playlist_id, message))
        }
        other => PlaylistResolutionError::Backend(other.to_string()),
    }
}

fn unavailable_reason(status: &VideoStatus) -> Option<UnavailableReason> {
    if status.privacy_status.as_deref() == Some("private") {
        return Some(UnavailableReason::Private);
    }

    match status.upload_status.as_deref() {
        Some("rejected") => {
            if status.rejection_reason.as_deref() == Some("copyright") {
                Some(UnavailableReason::CopyrightBlocked)
            } else {
                Some(UnavailableReason::Deleted)
            }
        }
        Some("deleted") | Some("failed") => Some(UnavailableReason::Deleted),
        _ => None,
    }
}
