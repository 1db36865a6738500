//! Integration tests for the extraction pipeline
//!
//! These tests drive a complete run through the public API: an in-memory
//! platform for pipeline behavior, and wiremock standing in for the
//! YouTube Data API for the end-to-end path.

use async_trait::async_trait;
use bandcamp_extractor::config::{Config, PlatformBackend, PlatformConfig};
use bandcamp_extractor::platform::{build_platform, UnavailableReason};
use bandcamp_extractor::{
    ExtractionRun, ExtractorError, FetchError, PlaylistResolutionError, RunCounters,
    VideoDetails, VideoPlatform, VideoRef,
};
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PLintegration";

/// In-memory playlist: video id -> fetch result
struct FakePlaylist {
    videos: Vec<(String, Result<VideoDetails, FetchError>)>,
    delay: Duration,
}

impl FakePlaylist {
    fn new() -> Self {
        Self {
            videos: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    fn video(mut self, id: &str, title: &str, description: &str) -> Self {
        self.videos.push((
            id.to_string(),
            Ok(VideoDetails {
                title: title.to_string(),
                description: description.to_string(),
            }),
        ));
        self
    }

    fn unavailable(mut self, id: &str, error: FetchError) -> Self {
        self.videos.push((id.to_string(), Err(error)));
        self
    }
}

#[async_trait]
impl VideoPlatform for FakePlaylist {
    async fn resolve_playlist(&self, _url: &str) -> Result<Vec<VideoRef>, PlaylistResolutionError> {
        Ok(self
            .videos
            .iter()
            .enumerate()
            .map(|(position, (id, _))| VideoRef::new(id.clone(), position))
            .collect())
    }

    async fn fetch_description(&self, identifier: &str) -> Result<VideoDetails, FetchError> {
        tokio::time::sleep(self.delay).await;
        self.videos
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| Err(FetchError::Network("unknown video".to_string())))
    }
}

/// Creates a test configuration with no pauses between batches
fn create_test_config(workers: usize, batch_size: usize) -> Config {
    let mut config = Config::default();
    config.extractor.workers = workers;
    config.extractor.batch_size = batch_size;
    config.extractor.batch_delay_ms = 0;
    config.extractor.video_timeout_secs = 5;
    config
}

/// Reads the CSV back as (title, url, links) rows keyed by URL, header excluded
fn read_output(path: &Path) -> HashMap<String, (String, String)> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open output");
    let headers = reader.headers().expect("Missing header").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["Video Title", "Video URL", "Bandcamp Links"]
    );

    reader
        .records()
        .map(|row| {
            let row = row.expect("Malformed row");
            (
                row[1].to_string(),
                (row[0].to_string(), row[2].to_string()),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_mixed_playlist_end_to_end() {
    let platform = FakePlaylist::new()
        .video(
            "A",
            "Live at the Hall",
            "Get the album: https://artist.bandcamp.com/album/x\nMerch: https://shop.example.com",
        )
        .unavailable(
            "B",
            FetchError::Unavailable(UnavailableReason::Private),
        )
        .video("C", "Vlog", "No music links here.");

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let run = ExtractionRun::new(Arc::new(platform), &create_test_config(4, 50));

    let counters = run.run(PLAYLIST_URL, &output).await.unwrap();

    assert_eq!(counters.total, 3);
    assert_eq!(counters.processed, 3);
    assert_eq!(counters.found, 1);
    assert_eq!(counters.skipped, 1);
    assert_eq!(counters.failed, 0);
    assert!(counters.is_complete());

    let rows = read_output(&output);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows["https://www.youtube.com/watch?v=A"],
        (
            "Live at the Hall".to_string(),
            "https://artist.bandcamp.com/album/x".to_string()
        )
    );
    assert_eq!(
        rows["https://www.youtube.com/watch?v=B"],
        ("Unavailable".to_string(), String::new())
    );
    assert_eq!(
        rows["https://www.youtube.com/watch?v=C"],
        ("Vlog".to_string(), String::new())
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_large_playlist_processes_every_video() {
    let mut platform = FakePlaylist::new();
    for i in 0..120 {
        platform = match i % 4 {
            0 => platform.video(
                &format!("v{}", i),
                &format!("Song {}", i),
                &format!("https://band{}.bandcamp.com/track/t and https://band{}.bandcamp.com/track/t", i, i),
            ),
            1 => platform.video(&format!("v{}", i), &format!("Song {}", i), ""),
            2 => platform.unavailable(
                &format!("v{}", i),
                FetchError::Unavailable(UnavailableReason::AgeRestricted),
            ),
            _ => platform.unavailable(
                &format!("v{}", i),
                FetchError::Network("connection reset".to_string()),
            ),
        };
    }
    platform.delay = Duration::from_millis(2);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let run = ExtractionRun::new(Arc::new(platform), &create_test_config(8, 25));

    let counters = run.run(PLAYLIST_URL, &output).await.unwrap();

    assert_eq!(
        counters,
        RunCounters {
            total: 120,
            processed: 120,
            found: 30,
            not_found: 30,
            skipped: 30,
            failed: 30,
            unpersisted: 0,
        }
    );

    let rows = read_output(&output);
    assert_eq!(rows.len(), 120);
    // Duplicate links within one description are collapsed
    assert_eq!(
        rows["https://www.youtube.com/watch?v=v0"].1,
        "https://band0.bandcamp.com/track/t"
    );
}

#[tokio::test]
async fn test_empty_playlist_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let run = ExtractionRun::new(Arc::new(FakePlaylist::new()), &create_test_config(4, 50));

    let counters = run.run(PLAYLIST_URL, &output).await.unwrap();

    assert_eq!(counters, RunCounters::new(0));
    assert!(read_output(&output).is_empty());
}

#[tokio::test]
async fn test_data_api_backend_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "PLintegration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"snippet": {"title": "One"}, "contentDetails": {"videoId": "one"}},
                {"snippet": {"title": "Two"}, "contentDetails": {"videoId": "two"}}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "snippet": {
                    "title": "One",
                    "description": "Out now (https://label.bandcamp.com/album/one)."
                },
                "status": {"privacyStatus": "public", "uploadStatus": "processed"}
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "two"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let mut config = create_test_config(2, 1);
    config.platform = PlatformConfig {
        backend: PlatformBackend::DataApi,
        api_key: Some("integration-key".to_string()),
        api_base_url: server.uri(),
        retries: 0,
        retry_delay_ms: 0,
        ..PlatformConfig::default()
    };

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let run = ExtractionRun::new(build_platform(&config.platform).unwrap(), &config);

    let counters = run.run(PLAYLIST_URL, &output).await.unwrap();

    assert_eq!(counters.processed, 2);
    assert_eq!(counters.found, 1);
    assert_eq!(counters.skipped, 1);

    let rows = read_output(&output);
    assert_eq!(
        rows["https://www.youtube.com/watch?v=one"].1,
        "https://label.bandcamp.com/album/one"
    );
    assert_eq!(rows["https://www.youtube.com/watch?v=two"].0, "Unavailable");
}

#[tokio::test]
async fn test_malformed_playlist_url_creates_no_output() {
    let server = MockServer::start().await;
    let config = PlatformConfig {
        backend: PlatformBackend::DataApi,
        api_key: Some("integration-key".to_string()),
        api_base_url: server.uri(),
        ..PlatformConfig::default()
    };

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let run = ExtractionRun::new(
        build_platform(&config).unwrap(),
        &create_test_config(4, 50),
    );

    let result = run
        .run("https://www.youtube.com/watch?v=abc", &output)
        .await;

    assert!(matches!(
        result,
        Err(ExtractorError::PlaylistResolution(
            PlaylistResolutionError::MissingPlaylistId(_)
        ))
    ));
    assert!(!output.exists());
}
