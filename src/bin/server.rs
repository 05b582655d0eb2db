//! comlog Server Binary
//!
//! Starts the TCP server for comlog.

use std::sync::Arc;

use clap::Parser;
use comlog::network::Server;
use comlog::{Config, Log};
use tracing_subscriber::{fmt, EnvFilter};

/// comlog Server
#[derive(Parser, Debug)]
#[command(name = "comlog-server")]
#[command(about = "Durable, append-only commit log server")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./comlog_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Maximum store file size per segment, in bytes
    #[arg(long, default_value = "1048576")]
    max_store_bytes: u64,

    /// Pre-allocated index size per segment, in bytes
    #[arg(long, default_value = "1048576")]
    max_index_bytes: u64,

    /// Offset assigned to the first record of a fresh log
    #[arg(long, default_value = "0")]
    initial_offset: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,comlog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("comlog Server v{}", comlog::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .max_store_bytes(args.max_store_bytes)
        .max_index_bytes(args.max_index_bytes)
        .initial_offset(args.initial_offset)
        .build();

    // Open the log (runs recovery over the data directory)
    let log = match Log::open(&config.data_dir, config.clone()) {
        Ok(l) => Arc::new(l),
        Err(e) => {
            tracing::error!("Failed to open log: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Log recovered: offsets [{}, {}], {} segment(s)",
        log.lowest_offset(),
        log.highest_offset(),
        log.segment_count()
    );

    // Start server
    let mut server = Server::new(config, log);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
