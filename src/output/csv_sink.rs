//! Incremental CSV result sink
//!
//! The sink owns the output file and the run counters. Each record is
//! encoded to a complete CSV row in memory, then written and flushed inside
//! one critical section, so an interrupted run leaves only whole rows behind.

use super::stats::RunCounters;
use crate::extractor::RecordSink;
use crate::state::VideoRecord;
use crate::ExtractorError;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Column names written as the first row
pub const CSV_HEADER: [&str; 3] = ["Video Title", "Video URL", "Bandcamp Links"];

struct SinkState<W> {
    /// `None` once the sink has been closed
    writer: Option<W>,
    counters: RunCounters,
}

/// Appends one CSV row per video record and keeps the run counters
pub struct ResultSink<W: Write + Send = File> {
    path: PathBuf,
    delimiter: String,
    state: Mutex<SinkState<W>>,
}

impl ResultSink<File> {
    /// Creates (or truncates) the output file and writes the header row
    ///
    /// Failing to open the path is the only fatal output error.
    ///
    /// # Arguments
    ///
    /// * `path` - Where to write the CSV
    /// * `total` - Number of videos in the playlist, for progress reporting
    /// * `delimiter` - Separator placed between links in the last column
    ///
    /// # Returns
    ///
    /// * `Ok(ResultSink)` - The file is open and holds the header row
    /// * `Err(ExtractorError::Output)` - The path could not be opened or written
    pub fn create(path: &Path, total: usize, delimiter: &str) -> Result<Self, ExtractorError> {
        let output_error = |source: io::Error| ExtractorError::Output {
            path: path.display().to_string(),
            source,
        };

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(output_error)?;

        let sink = Self::from_writer(file, path, total, delimiter).map_err(output_error)?;
        tracing::debug!("Opened output {}", path.display());
        Ok(sink)
    }
}

impl<W: Write + Send> ResultSink<W> {
    /// Wraps an already open writer and writes the header row to it
    pub fn from_writer(
        mut writer: W,
        path: &Path,
        total: usize,
        delimiter: &str,
    ) -> io::Result<Self> {
        write_row(&mut writer, &encode_row(&CSV_HEADER)?, &mut 0)?;

        Ok(Self {
            path: path.to_path_buf(),
            delimiter: delimiter.to_string(),
            state: Mutex::new(SinkState {
                writer: Some(writer),
                counters: RunCounters::new(total),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counts the record and appends its row
    ///
    /// A failed write is retried once, resuming after any bytes the first
    /// attempt already wrote. If the retry fails too the record stays counted
    /// and is tallied as unpersisted.
    ///
    /// # Returns
    ///
    /// * `true` - The whole row is in the file and flushed
    /// * `false` - The row could not be saved
    pub fn accept(&self, record: &VideoRecord) -> bool {
        let links = record.joined_links(&self.delimiter);
        let row = match encode_row(&[record.title.as_str(), record.url.as_str(), links.as_str()]) {
            Ok(row) => row,
            Err(e) => {
                tracing::error!("Could not encode row for {}: {}", record.url, e);
                let mut state = self.lock();
                state.counters.record(record.outcome());
                state.counters.unpersisted += 1;
                return false;
            }
        };

        let mut state = self.lock();
        state.counters.record(record.outcome());

        let Some(writer) = state.writer.as_mut() else {
            tracing::warn!("Output already closed, dropping row for {}", record.url);
            state.counters.unpersisted += 1;
            return false;
        };

        // The retry resumes after the bytes the first attempt got through,
        // so a partial write never leaves a duplicated field behind
        let mut offset = 0;
        let written = match write_row(writer, &row, &mut offset) {
            Ok(()) => Ok(()),
            Err(first) => {
                tracing::warn!(
                    "Write failed for {} after {} of {} bytes, retrying: {}",
                    record.url,
                    offset,
                    row.len(),
                    first
                );
                write_row(writer, &row, &mut offset)
            }
        };

        match written {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Could not save row for {}: {}", record.url, e);
                state.counters.unpersisted += 1;
                false
            }
        }
    }

    /// Snapshot of the current counters
    pub fn counters(&self) -> RunCounters {
        self.lock().counters
    }

    /// Flushes and releases the writer
    ///
    /// Waits for any in-progress row to finish. Later records are still
    /// counted but no longer written.
    pub fn close(&self) -> RunCounters {
        let mut state = self.lock();
        if let Some(mut writer) = state.writer.take() {
            if let Err(e) = writer.flush() {
                tracing::warn!("Final flush of {} failed: {}", self.path.display(), e);
            }
        }
        state.counters
    }

    fn lock(&self) -> MutexGuard<'_, SinkState<W>> {
        // A panic while holding the lock cannot leave a half-written row in
        // the buffer, so the state is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> RecordSink for ResultSink<W> {
    fn on_record(&self, record: VideoRecord) {
        self.accept(&record);
    }

    fn counters(&self) -> RunCounters {
        ResultSink::counters(self)
    }
}

/// Encodes one CSV row (with standard quoting) into bytes
fn encode_row(fields: &[&str]) -> io::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(fields).map_err(io::Error::from)?;
    writer.into_inner().map_err(|e| e.into_error())
}

/// Writes `row[*offset..]` and flushes, advancing `offset` past every byte accepted
///
/// # Arguments
///
/// * `writer` - Destination of the row
/// * `row` - One complete, encoded CSV row
/// * `offset` - Bytes of `row` already written; updated even when an error is returned
///
/// # Returns
///
/// * `Ok(())` - The whole row was written and flushed
/// * `Err(io::Error)` - The writer failed; `offset` tells how far it got
fn write_row<W: Write>(writer: &mut W, row: &[u8], offset: &mut usize) -> io::Result<()> {
    while *offset < row.len() {
        match writer.write(&row[*offset..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole row",
                ))
            }
            Ok(n) => *offset += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    writer.flush()
}
