//! Extraction pipeline
//!
//! This module contains the core extraction logic, including:
//! - Per-video fetch, link matching and outcome classification
//! - Batching and the bounded worker pool
//! - Overall run orchestration and the run log

mod processor;
mod run;
mod scheduler;

pub use processor::VideoProcessor;
pub use run::ExtractionRun;
pub use scheduler::{partition, BatchScheduler};

use crate::output::RunCounters;
use crate::state::VideoRecord;

/// Receiver for finished video records
///
/// Called from several workers at once, in completion order.
pub trait RecordSink: Send + Sync {
    /// Accepts one finished record
    fn on_record(&self, record: VideoRecord);

    /// Snapshot of the counters for records accepted so far
    fn counters(&self) -> RunCounters;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::RecordSink;
    use crate::output::RunCounters;
    use crate::platform::{VideoDetails, VideoPlatform, VideoRef};
    use crate::state::VideoRecord;
    use crate::{FetchError, PlaylistResolutionError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Whether an event marks the start or the end of a fetch
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum Phase {
        Start,
        End,
    }

    /// Platform double with scripted answers and concurrency bookkeeping
    #[derive(Default)]
    pub(crate) struct ScriptedPlatform {
        pub playlist: Vec<VideoRef>,
        pub responses: HashMap<String, Result<VideoDetails, FetchError>>,
        pub delay: Duration,
        pub in_flight: AtomicUsize,
        pub max_in_flight: AtomicUsize,
        pub calls: AtomicUsize,
        pub events: Mutex<Vec<(String, Phase)>>,
    }

    impl ScriptedPlatform {
        pub fn with_videos(count: usize, delay: Duration) -> Self {
            Self {
                playlist: (0..count).map(|i| VideoRef::new(format!("v{}", i), i)).collect(),
                delay,
                ..Self::default()
            }
        }

        pub fn respond(mut self, id: &str, response: Result<VideoDetails, FetchError>) -> Self {
            self.responses.insert(id.to_string(), response);
            self
        }
    }

    pub(crate) fn details(title: &str, description: &str) -> Result<VideoDetails, FetchError> {
        Ok(VideoDetails {
            title: title.to_string(),
            description: description.to_string(),
        })
    }

    #[async_trait]
    impl VideoPlatform for ScriptedPlatform {
        async fn resolve_playlist(
            &self,
            _url: &str,
        ) -> Result<Vec<VideoRef>, PlaylistResolutionError> {
            Ok(self.playlist.clone())
        }

        async fn fetch_description(&self, identifier: &str) -> Result<VideoDetails, FetchError> {
            if identifier == "panic" {
                panic!("scripted panic");
            }

            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.events
                .lock()
                .unwrap()
                .push((identifier.to_string(), Phase::Start));

            tokio::time::sleep(self.delay).await;

            self.events
                .lock()
                .unwrap()
                .push((identifier.to_string(), Phase::End));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.responses
                .get(identifier)
                .cloned()
                .unwrap_or_else(|| details(identifier, "nothing to see"))
        }
    }

    /// Sink that keeps every record in memory
    pub(crate) struct CollectingSink {
        pub records: Mutex<Vec<VideoRecord>>,
        counters: Mutex<RunCounters>,
    }

    impl CollectingSink {
        pub fn new(total: usize) -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                counters: Mutex::new(RunCounters::new(total)),
            }
        }
    }

    impl RecordSink for CollectingSink {
        fn on_record(&self, record: VideoRecord) {
            self.counters.lock().unwrap().record(record.outcome());
            self.records.lock().unwrap().push(record);
        }

        fn counters(&self) -> RunCounters {
            *self.counters.lock().unwrap()
        }
    }
}
