//! Segmented Log Module
//!
//! The storage engine core: an ordered sequence of immutable records
//! addressable by offset, physically split into rotating segments.
//!
//! ## Responsibilities
//! - Append-only, length-prefixed record storage (Store)
//! - Memory-mapped offset-to-position index (Index)
//! - Segment rollover when size thresholds are reached
//! - Crash-consistent recovery from directory contents
//! - Whole-segment truncation from the low end
//!
//! ## On-Disk Layout
//!
//! One pair of files per segment, named by the segment's base offset:
//! ```text
//! {data_dir}/
//!   ├── 0.store      ├── 0.index
//!   ├── 17.store     ├── 17.index
//!   └── ...
//! ```
//!
//! ### Store File Format
//! ```text
//! ┌─────────────────────────────────┐
//! │ Entry 1                         │
//! │ ┌─────────────┬───────────────┐ │
//! │ │ Len (8, BE) │    Payload    │ │
//! │ └─────────────┴───────────────┘ │
//! ├─────────────────────────────────┤
//! │ Entry 2                         │
//! │ ┌─────────────┬───────────────┐ │
//! │ │ Len (8, BE) │    Payload    │ │
//! │ └─────────────┴───────────────┘ │
//! └─────────────────────────────────┘
//! ```
//! No file header, no end marker — file length alone bounds valid reads.
//!
//! ### Index File Format
//! ```text
//! ┌─────────────────────────────────────┐
//! │ Entry 0                             │
//! │ ┌──────────────┬──────────────────┐ │
//! │ │ RelOff (4,BE)│ StorePos (8, BE) │ │
//! │ └──────────────┴──────────────────┘ │
//! ├─────────────────────────────────────┤
//! │ ... fixed 12-byte entries ...       │
//! └─────────────────────────────────────┘
//! ```
//! Pre-allocated to `max_index_bytes` and memory-mapped for the segment's
//! lifetime; truncated back to its logical size on close.

mod index;
mod segment;
#[allow(clippy::module_inception)]
mod log;
mod store;

pub use self::log::{Log, LogReader};
pub use index::{Index, ENTRY_WIDTH};
pub use segment::Segment;
pub use store::{Store, LEN_WIDTH};
