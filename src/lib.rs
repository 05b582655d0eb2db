//! # comlog
//!
//! A durable, append-only commit log with:
//! - Rotating segment files to bound size and enable retention
//! - Memory-mapped offset indexes for O(1) offset-to-position lookup
//! - Buffered writes with explicit flush/fsync discipline
//! - Crash-consistent recovery from directory contents
//! - TCP-based produce/consume protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Multiple Clients)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ produce / consume
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Log                                   │
//! │           (segment list, RwLock, rollover)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼────────────┐
//!          ▼            ▼            ▼
//!   ┌───────────┐ ┌───────────┐ ┌───────────┐
//!   │ Segment 0 │ │ Segment 1 │ │ Segment N │  ◄── active (last)
//!   └─────┬─────┘ └───────────┘ └───────────┘
//!         │
//!    ┌────┴─────┐
//!    ▼          ▼
//! ┌───────┐ ┌───────┐
//! │ Store │ │ Index │
//! │(file) │ │(mmap) │
//! └───────┘ └───────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod log;
pub mod network;
pub mod protocol;
pub mod record;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{ComlogError, Result};
pub use log::{Log, LogReader};
pub use record::Record;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of comlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
