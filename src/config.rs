//! Configuration for comlog
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a comlog instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the log's segment files.
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── {baseOffset}.store   (length-prefixed record payloads)
    ///     └── {baseOffset}.index   (fixed-width offset index)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Segment Configuration
    // -------------------------------------------------------------------------
    /// Max bytes a segment's store file may hold before rollover
    pub max_store_bytes: u64,

    /// Max bytes a segment's index file is pre-allocated with.
    /// Also the rollover trigger for the index side: each entry is 12 bytes,
    /// so this caps the number of records per segment.
    pub max_index_bytes: u64,

    /// Offset assigned to the very first record of a fresh log
    pub initial_offset: u64,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./comlog_data"),
            max_store_bytes: 1024,
            max_index_bytes: 1024,
            initial_offset: 0,
            listen_addr: "127.0.0.1:7878".to_string(),
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all segment files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the maximum store file size per segment (in bytes)
    pub fn max_store_bytes(mut self, bytes: u64) -> Self {
        self.config.max_store_bytes = bytes;
        self
    }

    /// Set the pre-allocated index size per segment (in bytes)
    pub fn max_index_bytes(mut self, bytes: u64) -> Self {
        self.config.max_index_bytes = bytes;
        self
    }

    /// Set the initial offset for a fresh log
    pub fn initial_offset(mut self, offset: u64) -> Self {
        self.config.initial_offset = offset;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
