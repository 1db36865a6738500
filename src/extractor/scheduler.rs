//! Batch scheduler for bounded parallel processing
//!
//! This module handles:
//! - Splitting the playlist into contiguous, fixed-size batches
//! - A worker pool (a semaphore shared by every batch) that caps in-flight fetches
//! - Treating each batch boundary as a barrier
//! - Pausing between batches to stay under platform rate limits

use super::{RecordSink, VideoProcessor};
use crate::output::RunCounters;
use crate::platform::VideoRef;
use crate::state::VideoRecord;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Splits videos into contiguous batches of at most `batch_size`, keeping order
///
/// Only the last batch may be short. A `batch_size` of zero is treated as one.
///
/// # Example
///
/// ```
/// use bandcamp_extractor::extractor::partition;
/// use bandcamp_extractor::platform::VideoRef;
///
/// let videos: Vec<VideoRef> = (0..5).map(|i| VideoRef::new(format!("v{}", i), i)).collect();
/// let batches = partition(videos, 2);
/// assert_eq!(batches.len(), 3);
/// assert_eq!(batches[2].len(), 1);
/// ```
pub fn partition(videos: Vec<VideoRef>, batch_size: usize) -> Vec<Vec<VideoRef>> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(videos.len().div_ceil(batch_size));
    let mut videos = videos.into_iter().peekable();

    while videos.peek().is_some() {
        batches.push(videos.by_ref().take(batch_size).collect());
    }

    batches
}

/// Drives a [`VideoProcessor`] over a playlist, one batch at a time
///
/// Within a batch every video is dispatched at once, but the shared worker
/// semaphore lets at most `worker_count` of them talk to the platform
/// concurrently. The next batch starts only after the current one has fully
/// drained. Records reach the sink in completion order.
pub struct BatchScheduler {
    processor: VideoProcessor,
    workers: Arc<Semaphore>,
    worker_count: usize,
    batch_size: usize,
    batch_delay: Duration,
}

impl BatchScheduler {
    /// Creates a scheduler and its worker pool
    ///
    /// Zero values for `worker_count` or `batch_size` are raised to one.
    pub fn new(
        processor: VideoProcessor,
        worker_count: usize,
        batch_size: usize,
        batch_delay: Duration,
    ) -> Self {
        let worker_count = worker_count.max(1);

        Self {
            processor,
            workers: Arc::new(Semaphore::new(worker_count)),
            worker_count,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches a playlist of `video_count` videos is split into
    pub fn batch_count(&self, video_count: usize) -> usize {
        video_count.div_ceil(self.batch_size)
    }

    /// Processes every video and returns the sink's final counters
    ///
    /// One video's failure never cancels its siblings or the batch.
    pub async fn run(&self, videos: Vec<VideoRef>, sink: Arc<dyn RecordSink>) -> RunCounters {
        let batches = partition(videos, self.batch_size);
        let total_batches = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            tracing::info!(
                "Processing batch {}/{} ({} videos)",
                index + 1,
                total_batches,
                batch.len()
            );

            self.run_batch(batch, &sink).await;

            tracing::info!("Progress: {}", sink.counters());

            let is_last = index + 1 == total_batches;
            if !is_last && !self.batch_delay.is_zero() {
                tracing::debug!("Pausing {:?} before the next batch", self.batch_delay);
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        sink.counters()
    }

    /// Dispatches one batch and waits until every member has reported
    async fn run_batch(&self, batch: Vec<VideoRef>, sink: &Arc<dyn RecordSink>) {
        let mut tasks = JoinSet::new();

        for video in batch {
            let workers = Arc::clone(&self.workers);
            let processor = self.processor.clone();
            let sink = Arc::clone(sink);

            tasks.spawn(async move {
                // The pool semaphore is never closed, so this only fails in theory
                let permit = workers.acquire_owned().await.ok();
                let record = process_isolated(processor, video).await;
                // Free the worker slot before waiting on the sink's file lock
                drop(permit);
                sink.on_record(record);
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task ended abnormally: {}", e);
            }
        }
    }
}

/// Runs the processor on its own task so a panic still yields a record
async fn process_isolated(processor: VideoProcessor, video: VideoRef) -> VideoRecord {
    let fallback = video.clone();

    match tokio::spawn(async move { processor.process(&video).await }).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("Processing {} crashed: {}", fallback.identifier, e);
            VideoRecord::failed(&fallback, format!("worker crashed: {}", e))
        }
    }
}
