//! Extraction run - top-level orchestration
//!
//! This module ties the pipeline together:
//! - Resolving the playlist (the only step allowed to abort a run)
//! - Opening the CSV sink
//! - Driving the batch scheduler
//! - Writing the run log: start line, one line per record, summary line

use super::{BatchScheduler, RecordSink, VideoProcessor};
use crate::config::Config;
use crate::output::{ResultSink, RunCounters};
use crate::platform::{VideoPlatform, VideoRef};
use crate::state::{VideoOutcome, VideoRecord};
use crate::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates one playlist extraction
pub struct ExtractionRun {
    platform: Arc<dyn VideoPlatform>,
    scheduler: BatchScheduler,
    link_delimiter: String,
}

impl ExtractionRun {
    /// Creates a run from a platform client and the loaded configuration
    pub fn new(platform: Arc<dyn VideoPlatform>, config: &Config) -> Self {
        let processor =
            VideoProcessor::new(Arc::clone(&platform), config.extractor.video_timeout());
        let scheduler = BatchScheduler::new(
            processor,
            config.extractor.workers,
            config.extractor.batch_size,
            config.extractor.batch_delay(),
        );

        Self {
            platform,
            scheduler,
            link_delimiter: config.output.link_delimiter.clone(),
        }
    }

    /// Resolves the playlist into its videos
    ///
    /// Fails fast on a malformed URL or an inaccessible playlist.
    pub async fn resolve(&self, playlist_url: &str) -> Result<Vec<VideoRef>> {
        tracing::info!("Fetching playlist information for {}", playlist_url);
        let videos = self.platform.resolve_playlist(playlist_url).await?;
        tracing::info!("Found {} videos in playlist", videos.len());
        Ok(videos)
    }

    /// Opens the output CSV for a resolved playlist
    pub fn open_sink(&self, output_path: &Path, total: usize) -> Result<Arc<ResultSink>> {
        Ok(Arc::new(ResultSink::create(
            output_path,
            total,
            &self.link_delimiter,
        )?))
    }

    /// Runs a complete extraction
    ///
    /// # Returns
    ///
    /// * `Ok(RunCounters)` - Every video was processed (individual failures are counted, not raised)
    /// * `Err(ExtractorError)` - The playlist could not be resolved or the output could not be opened
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bandcamp_extractor::config::Config;
    /// use bandcamp_extractor::extractor::ExtractionRun;
    /// use bandcamp_extractor::platform::build_platform;
    /// use std::path::Path;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config::default();
    /// let run = ExtractionRun::new(build_platform(&config.platform)?, &config);
    /// let counters = run
    ///     .run("https://www.youtube.com/playlist?list=PL123", Path::new("out.csv"))
    ///     .await?;
    /// println!("{}", counters);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, playlist_url: &str, output_path: &Path) -> Result<RunCounters> {
        let videos = self.resolve(playlist_url).await?;
        let sink = self.open_sink(output_path, videos.len())?;
        Ok(self.process(videos, sink).await)
    }

    /// Processes already resolved videos into an open sink
    ///
    /// The sink is closed when processing completes. Callers that need to
    /// react to interruption keep their own handle to the sink.
    pub async fn process(&self, videos: Vec<VideoRef>, sink: Arc<ResultSink>) -> RunCounters {
        let started = Instant::now();
        tracing::info!(
            "Run started at {}: {} videos, {} workers, batch size {} ({} batches), output {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            videos.len(),
            self.scheduler.worker_count(),
            self.scheduler.batch_size(),
            self.scheduler.batch_count(videos.len()),
            sink.path().display()
        );

        let logging_sink = Arc::new(LoggingSink {
            inner: Arc::clone(&sink),
        });
        self.scheduler.run(videos, logging_sink).await;

        let counters = sink.close();
        tracing::info!(
            "Run finished in {:.1}s: {}",
            started.elapsed().as_secs_f64(),
            counters
        );
        counters
    }
}

/// Writes one log line per record, then forwards it to the CSV sink
struct LoggingSink {
    inner: Arc<ResultSink>,
}

impl RecordSink for LoggingSink {
    fn on_record(&self, record: VideoRecord) {
        log_record(&record);
        self.inner.accept(&record);
    }

    fn counters(&self) -> RunCounters {
        self.inner.counters()
    }
}

fn log_record(record: &VideoRecord) {
    match record.outcome() {
        VideoOutcome::Found => tracing::info!(
            "Found {} Bandcamp link(s) in \"{}\" ({}): {}",
            record.bandcamp_links().len(),
            record.title,
            record.url,
            record.joined_links(", ")
        ),
        VideoOutcome::NoneFound => {
            tracing::debug!("No Bandcamp links in \"{}\" ({})", record.title, record.url)
        }
        VideoOutcome::Skipped(reason) => {
            tracing::warn!("Skipping {} video: {}", reason, record.url)
        }
        VideoOutcome::Failed(reason) => {
            tracing::error!("Error processing video {}: {}", record.url, reason)
        }
    }
}
