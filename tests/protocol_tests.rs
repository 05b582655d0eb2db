//! Tests for the wire protocol codec
//!
//! These tests verify:
//! - Command and response encode/decode round-trips
//! - Malformed frames are rejected
//! - Stream helpers frame messages correctly

use std::io::Cursor;

use comlog::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, Response, Status,
};
use comlog::ComlogError;

// =============================================================================
// Command Round-Trip Tests
// =============================================================================

#[test]
fn test_produce_roundtrip() {
    let command = Command::Produce {
        value: b"hello world".to_vec(),
    };
    let bytes = encode_command(&command);
    match decode_command(&bytes).unwrap() {
        Command::Produce { value } => assert_eq!(value, b"hello world"),
        other => panic!("expected Produce, got {:?}", other),
    }
}

#[test]
fn test_consume_roundtrip() {
    let command = Command::Consume { offset: 42 };
    let bytes = encode_command(&command);
    match decode_command(&bytes).unwrap() {
        Command::Consume { offset } => assert_eq!(offset, 42),
        other => panic!("expected Consume, got {:?}", other),
    }
}

#[test]
fn test_offsets_and_ping_roundtrip() {
    for command in [Command::Offsets, Command::Ping] {
        let bytes = encode_command(&command);
        let decoded = decode_command(&bytes).unwrap();
        assert_eq!(decoded.command_type(), command.command_type());
    }
}

// =============================================================================
// Malformed Frame Tests
// =============================================================================

#[test]
fn test_unknown_command_type_rejected() {
    let mut bytes = encode_command(&Command::Ping);
    bytes[0] = 0x7f;
    assert!(matches!(
        decode_command(&bytes),
        Err(ComlogError::Protocol(_))
    ));
}

#[test]
fn test_truncated_header_rejected() {
    assert!(matches!(
        decode_command(&[0x01, 0x00]),
        Err(ComlogError::Protocol(_))
    ));
}

#[test]
fn test_consume_with_short_offset_rejected() {
    // CONSUME frame whose payload is not exactly 8 bytes
    let bytes = [0x02, 0x00, 0x00, 0x00, 0x02, 0xaa, 0xbb];
    assert!(matches!(
        decode_command(&bytes),
        Err(ComlogError::Protocol(_))
    ));
}

#[test]
fn test_ping_with_payload_rejected() {
    let bytes = [0x04, 0x00, 0x00, 0x00, 0x01, 0xff];
    assert!(matches!(
        decode_command(&bytes),
        Err(ComlogError::Protocol(_))
    ));
}

// =============================================================================
// Response Round-Trip Tests
// =============================================================================

#[test]
fn test_response_roundtrip() {
    let cases = [
        Response::ok(Some(7u64.to_be_bytes().to_vec())),
        Response::ok(None),
        Response::not_found("the requested offset is outside the log's range: 9"),
        Response::error("boom"),
    ];

    for response in cases {
        let bytes = encode_response(&response);
        let decoded = decode_response(&bytes).unwrap();
        assert_eq!(decoded.status, response.status);
        assert_eq!(decoded.payload, response.payload);
    }
}

#[test]
fn test_unknown_status_rejected() {
    let mut bytes = encode_response(&Response::ok(None));
    bytes[0] = 0x7f;
    assert!(matches!(
        decode_response(&bytes),
        Err(ComlogError::Protocol(_))
    ));
}

// =============================================================================
// Stream Helper Tests
// =============================================================================

#[test]
fn test_stream_command_roundtrip() {
    let mut buf = Vec::new();
    write_command(&mut buf, &Command::Consume { offset: 3 }).unwrap();
    write_command(
        &mut buf,
        &Command::Produce {
            value: b"v".to_vec(),
        },
    )
    .unwrap();

    let mut cursor = Cursor::new(buf);
    assert!(matches!(
        read_command(&mut cursor).unwrap(),
        Command::Consume { offset: 3 }
    ));
    assert!(matches!(
        read_command(&mut cursor).unwrap(),
        Command::Produce { .. }
    ));
}

#[test]
fn test_stream_response_roundtrip() {
    let mut buf = Vec::new();
    write_response(&mut buf, &Response::ok(Some(b"PONG".to_vec()))).unwrap();

    let mut cursor = Cursor::new(buf);
    let response = read_response(&mut cursor).unwrap();
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload.as_deref(), Some(b"PONG".as_ref()));
}
