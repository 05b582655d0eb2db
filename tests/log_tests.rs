//! Tests for the Log
//!
//! These tests verify:
//! - Append/read round-trips across segment boundaries
//! - Out-of-range reads carry the requested offset
//! - Reopen reconstructs offsets and payloads from disk
//! - Rollover puts the new active segment at last offset + 1
//! - Truncate removes low segments and keeps the rest
//! - Reset drops all data
//! - The raw reader streams every store in order

use std::io::Read;

use comlog::{ComlogError, Config, Log, Record};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn config() -> Config {
    Config::default()
}

/// Config that rolls a new segment after every append
fn tiny_segment_config() -> Config {
    Config::builder().max_store_bytes(1).build()
}

fn append_values(log: &Log, values: &[&[u8]]) -> Vec<u64> {
    values
        .iter()
        .map(|v| log.append(&Record::new(v.to_vec())).unwrap())
        .collect()
}

// =============================================================================
// Append / Read Tests
// =============================================================================

#[test]
fn test_append_read_roundtrip() {
    let temp = TempDir::new().unwrap();
    let log = Log::open(temp.path(), config()).unwrap();

    let offsets = append_values(&log, &[b"one".as_ref(), b"two", b"three"]);
    assert_eq!(offsets, vec![0, 1, 2]);

    for (offset, value) in offsets.iter().zip([b"one".as_ref(), b"two", b"three"]) {
        let record = log.read(*offset).unwrap();
        assert_eq!(record.value, value);
        assert_eq!(record.offset, *offset);
    }
}

#[test]
fn test_fresh_log_has_one_segment_at_initial_offset() {
    let temp = TempDir::new().unwrap();
    let log = Log::open(temp.path(), config()).unwrap();

    assert_eq!(log.segment_count(), 1);
    assert_eq!(log.lowest_offset(), 0);
    assert_eq!(log.highest_offset(), 0);
}

#[test]
fn test_read_out_of_range_carries_offset() {
    let temp = TempDir::new().unwrap();
    let log = Log::open(temp.path(), config()).unwrap();
    append_values(&log, &[b"only".as_ref()]);

    let past_end = log.highest_offset() + 1;
    match log.read(past_end) {
        Err(ComlogError::OffsetOutOfRange { offset }) => assert_eq!(offset, past_end),
        other => panic!("expected OffsetOutOfRange, got {:?}", other),
    }
}

// =============================================================================
// Rollover Tests
// =============================================================================

#[test]
fn test_rollover_opens_segment_at_next_offset() {
    let temp = TempDir::new().unwrap();
    let log = Log::open(temp.path(), tiny_segment_config()).unwrap();

    let offsets = append_values(&log, &[b"a".as_ref(), b"b", b"c"]);
    assert_eq!(offsets, vec![0, 1, 2]);

    // Every append maxed the active segment, so each offset got its own
    // segment plus one fresh active segment at last offset + 1.
    assert_eq!(log.segment_count(), 4);
    assert_eq!(log.lowest_offset(), 0);
    assert_eq!(log.highest_offset(), 2);

    // All records remain readable across segment boundaries
    for offset in offsets {
        assert!(log.read(offset).is_ok());
    }
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[test]
fn test_reopen_reconstructs_log_state() {
    let temp = TempDir::new().unwrap();
    let values: Vec<&[u8]> = vec![b"alpha", b"beta", b"gamma", b"delta"];

    let (lowest, highest) = {
        let log = Log::open(temp.path(), tiny_segment_config()).unwrap();
        append_values(&log, &values);
        let bounds = (log.lowest_offset(), log.highest_offset());
        log.close().unwrap();
        bounds
    };

    let log = Log::open(temp.path(), tiny_segment_config()).unwrap();
    assert_eq!(log.lowest_offset(), lowest);
    assert_eq!(log.highest_offset(), highest);

    for (offset, value) in (lowest..=highest).zip(&values) {
        let record = log.read(offset).unwrap();
        assert_eq!(&record.value, value);
        assert_eq!(record.offset, offset);
    }
}

#[test]
fn test_double_close_preserves_index() {
    let temp = TempDir::new().unwrap();

    {
        let log = Log::open(temp.path(), config()).unwrap();
        append_values(&log, &[b"x".as_ref(), b"y"]);
        log.close().unwrap();
        log.close().unwrap();
    }

    let log = Log::open(temp.path(), config()).unwrap();
    assert_eq!(log.highest_offset(), 1);
    assert_eq!(log.read(1).unwrap().value, b"y");
}

#[test]
fn test_recovery_rejects_unexpected_files() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("not-a-segment.txt"), b"junk").unwrap();

    assert!(matches!(
        Log::open(temp.path(), config()),
        Err(ComlogError::Recovery(_))
    ));
}

// =============================================================================
// Truncate / Reset Tests
// =============================================================================

#[test]
fn test_truncate_removes_low_segments() {
    let temp = TempDir::new().unwrap();
    let log = Log::open(temp.path(), tiny_segment_config()).unwrap();
    append_values(&log, &[b"a".as_ref(), b"b", b"c"]);

    log.truncate(1).unwrap();

    for truncated in [0, 1] {
        match log.read(truncated) {
            Err(ComlogError::OffsetOutOfRange { offset }) => assert_eq!(offset, truncated),
            other => panic!("expected OffsetOutOfRange, got {:?}", other),
        }
    }
    assert_eq!(log.read(2).unwrap().value, b"c");
    assert_eq!(log.lowest_offset(), 2);
    assert_eq!(log.highest_offset(), 2);
}

#[test]
fn test_truncate_everything_keeps_log_appendable() {
    let temp = TempDir::new().unwrap();
    let log = Log::open(temp.path(), tiny_segment_config()).unwrap();
    append_values(&log, &[b"a".as_ref(), b"b"]);

    // Cutoff at or past the highest offset removes every segment
    log.truncate(10).unwrap();
    for truncated in [0, 1] {
        match log.read(truncated) {
            Err(ComlogError::OffsetOutOfRange { offset }) => assert_eq!(offset, truncated),
            other => panic!("expected OffsetOutOfRange, got {:?}", other),
        }
    }

    let offset = log.append(&Record::new(b"again".to_vec())).unwrap();
    assert_eq!(offset, 11);
    assert_eq!(log.read(offset).unwrap().value, b"again");
}

#[test]
fn test_reset_drops_all_data() {
    let temp = TempDir::new().unwrap();
    let log = Log::open(temp.path(), config()).unwrap();
    append_values(&log, &[b"a".as_ref(), b"b", b"c"]);

    log.reset().unwrap();

    assert_eq!(log.lowest_offset(), 0);
    assert_eq!(log.highest_offset(), 0);
    assert!(log.read(0).is_err());

    // Fresh offsets start over at the initial offset
    let offset = log.append(&Record::new(b"new".to_vec())).unwrap();
    assert_eq!(offset, 0);
}

// =============================================================================
// Raw Reader Tests
// =============================================================================

#[test]
fn test_reader_streams_raw_store_bytes() {
    let temp = TempDir::new().unwrap();
    let log = Log::open(temp.path(), tiny_segment_config()).unwrap();
    let values: Vec<&[u8]> = vec![b"one", b"two", b"three"];
    append_values(&log, &values);

    let mut bytes = Vec::new();
    log.reader().read_to_end(&mut bytes).unwrap();

    // The stream is the concatenation of length-prefixed entries; walk the
    // framing and decode each record.
    let mut decoded = Vec::new();
    let mut at = 0usize;
    while at < bytes.len() {
        let len = u64::from_be_bytes(bytes[at..at + 8].try_into().unwrap()) as usize;
        let record = Record::decode(&bytes[at + 8..at + 8 + len]).unwrap();
        decoded.push(record);
        at += 8 + len;
    }

    assert_eq!(decoded.len(), values.len());
    for (i, record) in decoded.iter().enumerate() {
        assert_eq!(record.offset, i as u64);
        assert_eq!(record.value, values[i]);
    }
}
