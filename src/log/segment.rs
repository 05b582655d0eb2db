//! Segment
//!
//! Binds one Store and one Index covering the contiguous offset range
//! `[base_offset, next_offset)`, translating logical offsets to store
//! positions and reporting when size thresholds demand rollover.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ComlogError, Result};
use crate::record::Record;

use super::{Index, Store};

/// One segment of the log: a store/index file pair plus its offset range
pub struct Segment {
    store: Arc<Store>,
    index: Index,

    store_path: PathBuf,
    index_path: PathBuf,

    /// First logical offset this segment may hold
    base_offset: u64,

    /// Offset the next append will be assigned (exclusive upper bound).
    /// Only mutated under the log's exclusive lock.
    next_offset: AtomicU64,

    max_store_bytes: u64,
    max_index_bytes: u64,
}

impl Segment {
    /// Open or create the segment with the given base offset in `dir`
    ///
    /// `next_offset` is recovered from the index's last entry, or equals
    /// `base_offset` if the index is empty.
    pub fn open(dir: &Path, base_offset: u64, config: &Config) -> Result<Self> {
        let store_path = dir.join(format!("{}.store", base_offset));
        let index_path = dir.join(format!("{}.index", base_offset));

        let store = Arc::new(Store::open(&store_path)?);
        let index = Index::open(&index_path, config.max_index_bytes)?;

        let next_offset = match index.read_last() {
            Ok((rel, _)) => base_offset + rel as u64 + 1,
            Err(ComlogError::IndexOutOfBounds) => base_offset,
            Err(e) => return Err(e),
        };

        Ok(Self {
            store,
            index,
            store_path,
            index_path,
            base_offset,
            next_offset: AtomicU64::new(next_offset),
            max_store_bytes: config.max_store_bytes,
            max_index_bytes: config.max_index_bytes,
        })
    }

    /// Append a record, returning the offset assigned to it
    ///
    /// Stamps the record with `next_offset`, writes the encoded bytes to the
    /// store, records the position in the index, and only then advances
    /// `next_offset` — a failure at any step leaves the offset unassigned.
    pub fn append(&self, record: &Record) -> Result<u64> {
        let offset = self.next_offset.load(Ordering::SeqCst);

        let mut stamped = record.clone();
        stamped.offset = offset;
        let bytes = stamped.encode()?;

        let (_, position) = self.store.append(&bytes)?;
        self.index
            .write(position, (offset - self.base_offset) as u32)?;

        self.next_offset.store(offset + 1, Ordering::SeqCst);
        Ok(offset)
    }

    /// Read the record at the given logical offset
    ///
    /// An offset outside `[base_offset, next_offset)` surfaces as
    /// `OffsetOutOfRange` via the index lookup.
    pub fn read(&self, offset: u64) -> Result<Record> {
        let rel = offset
            .checked_sub(self.base_offset)
            .ok_or(ComlogError::OffsetOutOfRange { offset })?;
        // Entry numbers are 32-bit; anything wider cannot be in this segment
        // and must not wrap into a valid entry.
        let rel = u32::try_from(rel).map_err(|_| ComlogError::OffsetOutOfRange { offset })?;

        let (_, position) = match self.index.read(rel) {
            Ok(entry) => entry,
            Err(ComlogError::IndexOutOfBounds) => {
                return Err(ComlogError::OffsetOutOfRange { offset })
            }
            Err(e) => return Err(e),
        };

        let bytes = self.store.read(position)?;
        Record::decode(&bytes)
    }

    /// True when either file has reached its configured maximum
    ///
    /// Checked by the log after every append; the trigger for rollover.
    pub fn is_maxed_out(&self) -> bool {
        self.store.size() >= self.max_store_bytes || self.index.size() >= self.max_index_bytes
    }

    /// Whether `offset` falls in this segment's coverage
    pub fn contains(&self, offset: u64) -> bool {
        self.base_offset <= offset && offset < self.next_offset.load(Ordering::SeqCst)
    }

    /// First logical offset this segment covers
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Exclusive upper bound of this segment's coverage
    pub fn next_offset(&self) -> u64 {
        self.next_offset.load(Ordering::SeqCst)
    }

    /// Shared handle to the raw store, for whole-log streaming
    pub(crate) fn store(&self) -> Arc<Store> {
        Arc::clone(&self.store)
    }

    /// Close index then store, both fsync'd
    pub fn close(&self) -> Result<()> {
        self.index.close()?;
        self.store.close()?;
        Ok(())
    }

    /// Close and delete both backing files
    pub fn remove(&self) -> Result<()> {
        self.close()?;
        fs::remove_file(&self.index_path)?;
        fs::remove_file(&self.store_path)?;
        Ok(())
    }
}
