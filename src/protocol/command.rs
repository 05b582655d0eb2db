//! Command definitions
//!
//! Represents commands from clients.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Produce = 0x01,
    Consume = 0x02,
    Offsets = 0x03,
    Ping = 0x04,
}

/// A parsed command
#[derive(Debug, Clone)]
pub enum Command {
    /// Append a record value to the log
    Produce { value: Vec<u8> },

    /// Read the record at an offset
    Consume { offset: u64 },

    /// Query the valid read range (lowest and highest offsets)
    Offsets,

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Produce { .. } => CommandType::Produce,
            Command::Consume { .. } => CommandType::Consume,
            Command::Offsets => CommandType::Offsets,
            Command::Ping => CommandType::Ping,
        }
    }
}
