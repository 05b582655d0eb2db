//! Record definition and codec
//!
//! A record is an opaque payload plus the offset the engine assigned to it.
//! The log core treats the serialized form as opaque bytes; this module is
//! the codec boundary it calls exactly once per append and once per read.

use serde::{Deserialize, Serialize};

use crate::error::{ComlogError, Result};

/// A single record in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Logical offset, assigned by the engine on append.
    /// Dense and strictly increasing per log.
    pub offset: u64,

    /// Opaque payload
    pub value: Vec<u8>,
}

impl Record {
    /// Create a record with an unassigned offset
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            offset: 0,
            value: value.into(),
        }
    }

    /// Serialize to bytes for the store
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| ComlogError::Serialization(e.to_string()))
    }

    /// Deserialize from store bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| ComlogError::Serialization(e.to_string()))
    }
}
