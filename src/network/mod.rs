//! Network Module
//!
//! TCP server exposing the log's produce/consume operations over the
//! binary wire protocol.
//!
//! ## Responsibilities
//! - Accept loop with a concurrent-connection cap
//! - One worker thread per client connection
//! - Graceful shutdown signaling

mod connection;
mod server;

pub use connection::Connection;
pub use server::Server;
