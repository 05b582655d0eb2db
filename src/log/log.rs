//! Log
//!
//! The segment coordinator: presents one logical, gapless, truncatable
//! commit log over an ordered set of segments, and owns recovery from the
//! log directory and the rollover policy.
//!
//! ## Concurrency
//! One reader/writer lock guards the segment list; the active segment is
//! always the last one. Append, rollover, truncation, close, and reset take
//! the exclusive form; reads and boundary queries take the shared form.
//! Store and Index carry their own locks, so reads against different
//! segments proceed independently once past the shared lock.

use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{ComlogError, Result};
use crate::record::Record;

use super::{Segment, Store};

/// A durable, append-only commit log over rotating segments
pub struct Log {
    dir: PathBuf,
    config: Config,
    segments: RwLock<Vec<Arc<Segment>>>,
}

impl Log {
    /// Open or create a log in the given directory
    ///
    /// Recovers one segment per base offset discovered on disk; an empty
    /// directory gets a fresh segment at the configured initial offset.
    pub fn open(dir: &Path, mut config: Config) -> Result<Self> {
        if config.max_store_bytes == 0 {
            config.max_store_bytes = 1024;
        }
        if config.max_index_bytes == 0 {
            config.max_index_bytes = 1024;
        }

        fs::create_dir_all(dir)?;
        let segments = Self::setup(dir, &config)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            config,
            segments: RwLock::new(segments),
        })
    }

    /// Rebuild the segment list from directory contents
    ///
    /// Each segment contributes two files sharing the same base offset, so
    /// discovered names are grouped into a set of distinct offsets first and
    /// exactly one segment is constructed per distinct offset.
    fn setup(dir: &Path, config: &Config) -> Result<Vec<Arc<Segment>>> {
        let mut base_offsets = BTreeSet::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            let base = stem.parse::<u64>().map_err(|_| {
                ComlogError::Recovery(format!(
                    "unexpected file in log directory: {}",
                    path.display()
                ))
            })?;
            base_offsets.insert(base);
        }

        let mut segments = Vec::with_capacity(base_offsets.len().max(1));
        for base in base_offsets {
            segments.push(Arc::new(Segment::open(dir, base, config)?));
        }

        if segments.is_empty() {
            segments.push(Arc::new(Segment::open(dir, config.initial_offset, config)?));
        }
        Ok(segments)
    }

    /// Append a record, returning the offset assigned to it
    ///
    /// Delegates to the active segment; if the segment reports itself maxed
    /// out after a successful append, a new active segment is rolled at
    /// `assigned + 1`. The check runs strictly after the append, so a
    /// segment may exceed its nominal threshold by one record.
    pub fn append(&self, record: &Record) -> Result<u64> {
        let mut segments = self.segments.write();
        let active = segments
            .last()
            .ok_or_else(|| ComlogError::Recovery("log has no segments".to_string()))?;

        let offset = active.append(record)?;

        if active.is_maxed_out() {
            tracing::debug!(
                base_offset = offset + 1,
                "active segment maxed out, rolling new segment"
            );
            let segment = Segment::open(&self.dir, offset + 1, &self.config)?;
            segments.push(Arc::new(segment));
        }
        Ok(offset)
    }

    /// Read the record at the given offset
    ///
    /// Linear scan over segments for range membership — segment count stays
    /// small relative to records per segment.
    pub fn read(&self, offset: u64) -> Result<Record> {
        let segments = self.segments.read();
        for segment in segments.iter() {
            if segment.contains(offset) {
                return segment.read(offset);
            }
        }
        Err(ComlogError::OffsetOutOfRange { offset })
    }

    /// First offset covered by the log (0 when the log is empty)
    pub fn lowest_offset(&self) -> u64 {
        let segments = self.segments.read();
        segments.first().map(|s| s.base_offset()).unwrap_or(0)
    }

    /// Last assigned offset (0 when the log is empty)
    pub fn highest_offset(&self) -> u64 {
        let segments = self.segments.read();
        match segments.last() {
            Some(s) => s.next_offset().saturating_sub(1),
            None => 0,
        }
    }

    /// Remove every segment whose entire coverage is at or below `off`
    ///
    /// Used to enforce retention. If truncation would remove every segment,
    /// a fresh one is rolled at `off + 1` so the log stays appendable.
    pub fn truncate(&self, off: u64) -> Result<()> {
        let mut segments = self.segments.write();

        let mut kept = Vec::with_capacity(segments.len());
        for segment in segments.drain(..) {
            if segment.next_offset() <= off + 1 {
                segment.remove()?;
            } else {
                kept.push(segment);
            }
        }

        if kept.is_empty() {
            kept.push(Arc::new(Segment::open(&self.dir, off + 1, &self.config)?));
        }
        *segments = kept;
        Ok(())
    }

    /// Close every segment (flush + fsync). Safe to call more than once.
    pub fn close(&self) -> Result<()> {
        let segments = self.segments.write();
        Self::close_segments(&segments)
    }

    /// Close the log and delete its entire directory
    pub fn remove(&self) -> Result<()> {
        let mut segments = self.segments.write();
        Self::close_segments(&segments)?;
        segments.clear();
        fs::remove_dir_all(&self.dir)?;
        Ok(())
    }

    /// Drop all data and start over at the configured initial offset
    pub fn reset(&self) -> Result<()> {
        let mut segments = self.segments.write();
        Self::close_segments(&segments)?;
        segments.clear();
        fs::remove_dir_all(&self.dir)?;
        fs::create_dir_all(&self.dir)?;
        *segments = Self::setup(&self.dir, &self.config)?;
        Ok(())
    }

    fn close_segments(segments: &[Arc<Segment>]) -> Result<()> {
        for segment in segments {
            segment.close()?;
        }
        Ok(())
    }

    /// A reader over the concatenated raw store files of every segment
    ///
    /// Exposes the length-prefixed binary format directly, for whole-log
    /// transfer (snapshotting, replica bootstrap) rather than record-level
    /// consumption.
    pub fn reader(&self) -> LogReader {
        let segments = self.segments.read();
        LogReader {
            stores: segments.iter().map(|s| s.store()).collect(),
            current: 0,
            position: 0,
        }
    }

    /// The log's directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The log's configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of live segments (for testing and debugging)
    pub fn segment_count(&self) -> usize {
        self.segments.read().len()
    }
}

/// Streams the raw store contents of every segment in order
///
/// Holds shared handles to the stores, so it stays valid while the log
/// continues to accept appends; bytes appended after creation may or may
/// not be observed.
pub struct LogReader {
    stores: Vec<Arc<Store>>,
    current: usize,
    position: u64,
}

impl Read for LogReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        loop {
            let store = match self.stores.get(self.current) {
                Some(s) => s,
                None => return Ok(0),
            };

            let n = store
                .read_at(buf, self.position)
                .map_err(into_io_error)?;
            if n == 0 {
                // Exhausted this store, move to the next segment.
                self.current += 1;
                self.position = 0;
                continue;
            }

            self.position += n as u64;
            return Ok(n);
        }
    }
}

fn into_io_error(e: ComlogError) -> std::io::Error {
    match e {
        ComlogError::Io(io) => io,
        other => std::io::Error::new(std::io::ErrorKind::Other, other.to_string()),
    }
}
