//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: PRODUCE - Payload: record value
//! - 0x02: CONSUME - Payload: offset (8 bytes, BE)
//! - 0x03: OFFSETS - Payload: empty
//! - 0x04: PING    - Payload: empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK        - PRODUCE: assigned offset (8 bytes);
//!                     CONSUME: offset (8 bytes) + value;
//!                     OFFSETS: lowest (8 bytes) + highest (8 bytes)
//! - 0x01: NOT_FOUND - requested offset outside the log's range
//! - 0x02: ERROR     - opaque server-side failure (message in payload)

mod codec;
mod command;
mod response;

pub use codec::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response,
};
pub use command::{Command, CommandType};
pub use response::{Response, Status};
