//! TCP Server
//!
//! Accepts connections and dispatches to worker threads.

use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ComlogError, Result};
use crate::log::Log;

use super::Connection;

/// TCP server for comlog
pub struct Server {
    config: Config,
    log: Arc<Log>,
    shutdown: Arc<AtomicBool>,
    active_connections: Arc<AtomicUsize>,
}

impl Server {
    /// Create a new server with the given config and log
    pub fn new(config: Config, log: Arc<Log>) -> Self {
        Self {
            config,
            log,
            shutdown: Arc::new(AtomicBool::new(false)),
            active_connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start the server (blocking)
    ///
    /// Accepts connections until `shutdown` is signaled, spawning one worker
    /// thread per connection up to `max_connections`.
    pub fn run(&mut self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.listen_addr)
            .map_err(|e| ComlogError::Network(format!("bind {}: {}", self.config.listen_addr, e)))?;

        // Non-blocking accept so the loop can observe the shutdown flag.
        listener.set_nonblocking(true)?;

        tracing::info!("Listening on {}", self.config.listen_addr);

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                tracing::info!("Shutdown signaled, stopping accept loop");
                break;
            }

            let (stream, addr) = match listener.accept() {
                Ok(accepted) => accepted,
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(50));
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Accept error: {}", e);
                    continue;
                }
            };

            if self.active_connections.load(Ordering::Relaxed) >= self.config.max_connections {
                tracing::warn!("Connection limit reached, rejecting {}", addr);
                drop(stream);
                continue;
            }

            // Hand the stream back to blocking mode for the worker.
            if let Err(e) = stream.set_nonblocking(false) {
                tracing::warn!("Failed to configure stream for {}: {}", addr, e);
                continue;
            }

            let log = Arc::clone(&self.log);
            let active = Arc::clone(&self.active_connections);
            let read_timeout = self.config.read_timeout_ms;
            let write_timeout = self.config.write_timeout_ms;

            active.fetch_add(1, Ordering::Relaxed);
            thread::spawn(move || {
                let result = Connection::new(stream, log).and_then(|mut conn| {
                    conn.set_timeouts(read_timeout, write_timeout)?;
                    conn.handle()
                });
                if let Err(e) = result {
                    tracing::warn!("Connection {} ended with error: {}", addr, e);
                }
                active.fetch_sub(1, Ordering::Relaxed);
            });
        }

        // Flush the log before reporting the server stopped.
        self.log.close()?;
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Handle for signaling shutdown from another thread
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Number of currently active connections
    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }
}
