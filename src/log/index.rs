//! Index
//!
//! Fixed-width, memory-mapped offset index for one segment. Each entry maps
//! a segment-relative record number to the byte position of that record's
//! entry in the store file.
//!
//! The backing file is pre-allocated to its configured maximum at open and
//! truncated back to its logical size on close; the mapping capacity is
//! fixed for the segment's lifetime and does not grow.

use std::fs::{File, OpenOptions};
use std::path::Path;

use memmap2::MmapMut;
use parking_lot::Mutex;

use crate::error::{ComlogError, Result};

/// Width of the relative-offset field
const OFF_WIDTH: u64 = 4;
/// Width of the store-position field
const POS_WIDTH: u64 = 8;
/// Width of one index entry
pub const ENTRY_WIDTH: u64 = OFF_WIDTH + POS_WIDTH;

/// Memory-mapped offset index for one segment
///
/// Carries its own lock so that no caller can race the mapping, regardless
/// of what locks the enclosing segment or log hold.
pub struct Index {
    inner: Mutex<IndexInner>,
}

struct IndexInner {
    /// Backing file; `None` once closed
    file: Option<File>,

    /// Writable mapping over the pre-allocated region; `None` once closed
    mmap: Option<MmapMut>,

    /// Bytes actually written — always a multiple of `ENTRY_WIDTH`
    size: u64,

    /// Mapped capacity, fixed at open from configuration
    capacity: u64,
}

impl Index {
    /// Open or create the index file at `path`
    ///
    /// Records the file's current length as the logical size, pre-allocates
    /// the file to `max_index_bytes`, and maps the whole region. A config
    /// that under-sizes `max_index_bytes` caps how many records the segment
    /// can hold before forced rollover.
    pub fn open(path: &Path, max_index_bytes: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let size = file.metadata()?.len();
        file.set_len(max_index_bytes)?;

        // Safety: the mapping is private to this Index and the file is not
        // resized again until close, after the mapping is dropped.
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self {
            inner: Mutex::new(IndexInner {
                file: Some(file),
                mmap: Some(mmap),
                size,
                capacity: max_index_bytes,
            }),
        })
    }

    /// Append one entry mapping `relative_offset` to `position`
    ///
    /// Fails with `IndexFull` when the entry would not fit in the mapped
    /// capacity — the signal that the segment must roll over.
    pub fn write(&self, position: u64, relative_offset: u32) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.size + ENTRY_WIDTH > inner.capacity {
            return Err(ComlogError::IndexFull);
        }

        let at = inner.size as usize;
        let mmap = inner.mmap.as_mut().ok_or_else(closed)?;
        mmap[at..at + OFF_WIDTH as usize].copy_from_slice(&relative_offset.to_be_bytes());
        mmap[at + OFF_WIDTH as usize..at + ENTRY_WIDTH as usize]
            .copy_from_slice(&position.to_be_bytes());

        inner.size += ENTRY_WIDTH;
        Ok(())
    }

    /// Read entry number `entry`, returning `(relative_offset, position)`
    ///
    /// Fails with `IndexOutOfBounds` if the index is empty or the entry lies
    /// past the written region.
    pub fn read(&self, entry: u32) -> Result<(u32, u64)> {
        let inner = self.inner.lock();
        Self::read_entry(&inner, entry)
    }

    /// Read the last written entry
    ///
    /// Used at segment open to recover `next_offset`. Fails with
    /// `IndexOutOfBounds` on an empty index.
    pub fn read_last(&self) -> Result<(u32, u64)> {
        let inner = self.inner.lock();
        if inner.size == 0 {
            return Err(ComlogError::IndexOutOfBounds);
        }
        let last = (inner.size / ENTRY_WIDTH - 1) as u32;
        Self::read_entry(&inner, last)
    }

    fn read_entry(inner: &IndexInner, entry: u32) -> Result<(u32, u64)> {
        if inner.size == 0 {
            return Err(ComlogError::IndexOutOfBounds);
        }
        let at = entry as u64 * ENTRY_WIDTH;
        if at + ENTRY_WIDTH > inner.size {
            return Err(ComlogError::IndexOutOfBounds);
        }

        let mmap = inner.mmap.as_ref().ok_or_else(closed)?;
        let at = at as usize;
        let rel = u32::from_be_bytes([mmap[at], mmap[at + 1], mmap[at + 2], mmap[at + 3]]);
        let pos = u64::from_be_bytes([
            mmap[at + 4],
            mmap[at + 5],
            mmap[at + 6],
            mmap[at + 7],
            mmap[at + 8],
            mmap[at + 9],
            mmap[at + 10],
            mmap[at + 11],
        ]);
        Ok((rel, pos))
    }

    /// Bytes written so far (always a multiple of `ENTRY_WIDTH`)
    pub fn size(&self) -> u64 {
        self.inner.lock().size
    }

    /// Sync the mapping, truncate the file to its logical size, and close
    ///
    /// Ordering matters: mapping is synced and released before the file is
    /// synced and truncated, so no pre-allocated zero bytes survive as
    /// phantom entries. A second close is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        let mmap = match inner.mmap.take() {
            Some(m) => m,
            None => return Ok(()),
        };
        mmap.flush()?;
        drop(mmap);

        if let Some(file) = inner.file.take() {
            file.sync_all()?;
            file.set_len(inner.size)?;
            file.sync_all()?;
        }
        Ok(())
    }
}

fn closed() -> ComlogError {
    ComlogError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        "index is closed",
    ))
}
