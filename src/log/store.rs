//! Store
//!
//! Append-only file of length-prefixed record payloads with a buffered
//! writer and positional reads.
//!
//! ## Concurrency
//! All operations are serialized by one internal mutex, so a store is safe
//! to share across threads but performs one I/O operation at a time.
//! Appends are buffered and only guaranteed on disk after a flush, which
//! `read`/`read_at`/`close` perform implicitly.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use parking_lot::Mutex;

use crate::error::Result;

/// Width of the big-endian length prefix in front of every payload
pub const LEN_WIDTH: u64 = 8;

/// Append-only record file for one segment
pub struct Store {
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    /// Read handle; shares the file description with the writer's handle,
    /// so reads must seek explicitly after flushing the buffer.
    file: File,

    /// Buffered append handle (opened with O_APPEND)
    writer: BufWriter<File>,

    /// Current byte length of file content, including buffered writes
    size: u64,
}

impl Store {
    /// Open or create the store file at `path`
    ///
    /// An existing file is picked up where it left off: `size` starts at the
    /// file's current length and new entries are appended after it.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(path)?;

        let size = file.metadata()?.len();
        let writer = BufWriter::new(file.try_clone()?);

        Ok(Self {
            inner: Mutex::new(StoreInner { file, writer, size }),
        })
    }

    /// Append a payload, returning `(bytes_written, start_position)`
    ///
    /// Writes an 8-byte big-endian length prefix followed by the payload to
    /// the buffered writer. The returned position is the store's size before
    /// the write and is what the index records for this entry.
    pub fn append(&self, payload: &[u8]) -> Result<(u64, u64)> {
        let mut inner = self.inner.lock();
        let position = inner.size;

        inner
            .writer
            .write_all(&(payload.len() as u64).to_be_bytes())?;
        inner.writer.write_all(payload)?;

        let written = LEN_WIDTH + payload.len() as u64;
        inner.size += written;
        Ok((written, position))
    }

    /// Read the payload of the entry starting at `position`
    ///
    /// Flushes the write buffer first so the entry is visible, then reads
    /// the length prefix and the payload it frames. Fails with an I/O error
    /// if `position` is outside the file's current extent.
    pub fn read(&self, position: u64) -> Result<Vec<u8>> {
        let mut inner = self.inner.lock();
        inner.writer.flush()?;

        let mut len_buf = [0u8; LEN_WIDTH as usize];
        inner.file.seek(SeekFrom::Start(position))?;
        inner.file.read_exact(&mut len_buf)?;

        let mut payload = vec![0u8; u64::from_be_bytes(len_buf) as usize];
        inner.file.read_exact(&mut payload)?;
        Ok(payload)
    }

    /// Raw positional read into `buf`, bypassing per-record framing
    ///
    /// Returns the number of bytes read (0 at end of file). Used by the
    /// whole-log reader for snapshot-style bulk transfer.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let mut inner = self.inner.lock();
        inner.writer.flush()?;

        inner.file.seek(SeekFrom::Start(offset))?;
        let n = inner.file.read(buf)?;
        Ok(n)
    }

    /// Current byte length of store content (live + buffered)
    pub fn size(&self) -> u64 {
        self.inner.lock().size
    }

    /// Flush the buffer and fsync the file
    ///
    /// Safe to call more than once.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.writer.flush()?;
        inner.file.sync_all()?;
        Ok(())
    }
}
