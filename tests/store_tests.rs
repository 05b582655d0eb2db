//! Tests for the Store
//!
//! These tests verify:
//! - Append returns (bytes_written, start_position)
//! - Reads see buffered writes (implicit flush)
//! - Raw positional reads
//! - Reopen picks up existing content

use std::path::PathBuf;

use comlog::log::{Store, LEN_WIDTH};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const WRITE: &[u8] = b"hello world";

fn entry_width() -> u64 {
    LEN_WIDTH + WRITE.len() as u64
}

fn setup_temp_store() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("0.store");
    (temp_dir, store_path)
}

// =============================================================================
// Append / Read Tests
// =============================================================================

#[test]
fn test_append_returns_width_and_position() {
    let (_temp, path) = setup_temp_store();
    let store = Store::open(&path).unwrap();

    for i in 1..4u64 {
        let (written, position) = store.append(WRITE).unwrap();
        assert_eq!(written, entry_width());
        assert_eq!(position + written, entry_width() * i);
    }
    assert_eq!(store.size(), entry_width() * 3);
}

#[test]
fn test_read_returns_appended_payload() {
    let (_temp, path) = setup_temp_store();
    let store = Store::open(&path).unwrap();

    let mut positions = Vec::new();
    for _ in 0..3 {
        let (_, position) = store.append(WRITE).unwrap();
        positions.push(position);
    }

    for position in positions {
        assert_eq!(store.read(position).unwrap(), WRITE);
    }
}

#[test]
fn test_read_at_raw_framing() {
    let (_temp, path) = setup_temp_store();
    let store = Store::open(&path).unwrap();
    store.append(WRITE).unwrap();

    // Length prefix first
    let mut len_buf = [0u8; LEN_WIDTH as usize];
    let n = store.read_at(&mut len_buf, 0).unwrap();
    assert_eq!(n as u64, LEN_WIDTH);
    let len = u64::from_be_bytes(len_buf);
    assert_eq!(len, WRITE.len() as u64);

    // Then the payload
    let mut payload = vec![0u8; len as usize];
    let n = store.read_at(&mut payload, LEN_WIDTH).unwrap();
    assert_eq!(n, WRITE.len());
    assert_eq!(payload, WRITE);
}

#[test]
fn test_read_past_extent_fails() {
    let (_temp, path) = setup_temp_store();
    let store = Store::open(&path).unwrap();
    store.append(WRITE).unwrap();

    assert!(store.read(entry_width() * 10).is_err());
}

// =============================================================================
// Reopen / Close Tests
// =============================================================================

#[test]
fn test_reopen_picks_up_existing_content() {
    let (_temp, path) = setup_temp_store();

    {
        let store = Store::open(&path).unwrap();
        store.append(WRITE).unwrap();
        store.close().unwrap();
    }

    let store = Store::open(&path).unwrap();
    assert_eq!(store.size(), entry_width());
    assert_eq!(store.read(0).unwrap(), WRITE);

    // Appends continue after the existing content
    let (_, position) = store.append(WRITE).unwrap();
    assert_eq!(position, entry_width());
}

#[test]
fn test_close_flushes_buffer() {
    let (_temp, path) = setup_temp_store();
    let store = Store::open(&path).unwrap();
    store.append(WRITE).unwrap();

    let before = std::fs::metadata(&path).unwrap().len();
    store.close().unwrap();
    let after = std::fs::metadata(&path).unwrap().len();

    assert!(before < after);
    assert_eq!(after, entry_width());
}

#[test]
fn test_close_is_idempotent() {
    let (_temp, path) = setup_temp_store();
    let store = Store::open(&path).unwrap();
    store.append(WRITE).unwrap();

    store.close().unwrap();
    store.close().unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), entry_width());
}
