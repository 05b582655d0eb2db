//! Error types for comlog
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ComlogError
pub type Result<T> = std::result::Result<T, ComlogError>;

/// Unified error type for comlog operations
#[derive(Debug, Error)]
pub enum ComlogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    /// The requested read offset is not covered by any segment.
    ///
    /// This is the only error with a user-facing identity: the network layer
    /// translates it into a NOT_FOUND response carrying the offset.
    #[error("offset out of range: {offset}")]
    OffsetOutOfRange { offset: u64 },

    /// A write would exceed the index's pre-allocated mapped capacity.
    #[error("index is full")]
    IndexFull,

    /// An index read addressed an entry past the written region.
    #[error("index entry out of bounds")]
    IndexOutOfBounds,

    #[error("recovery error: {0}")]
    Recovery(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
