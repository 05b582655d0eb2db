//! comlog CLI Client
//!
//! Command-line interface for producing to and consuming from a comlog
//! server.

use std::net::TcpStream;

use clap::{Parser, Subcommand};
use comlog::protocol::{read_response, write_command, Command, Status};

/// comlog CLI
#[derive(Parser, Debug)]
#[command(name = "comlog-cli")]
#[command(about = "CLI for the comlog commit log server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append a record and print its assigned offset
    Produce {
        /// The record value
        value: String,
    },

    /// Read the record at an offset
    Consume {
        /// The offset to read
        offset: u64,
    },

    /// Print the log's lowest and highest offsets
    Offsets,

    /// Ping the server
    Ping,
}

fn main() {
    let args = Args::parse();

    let command = match &args.command {
        Commands::Produce { value } => Command::Produce {
            value: value.clone().into_bytes(),
        },
        Commands::Consume { offset } => Command::Consume { offset: *offset },
        Commands::Offsets => Command::Offsets,
        Commands::Ping => Command::Ping,
    };

    let mut stream = match TcpStream::connect(&args.server) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    let response = write_command(&mut stream, &command)
        .and_then(|_| read_response(&mut stream))
        .unwrap_or_else(|e| {
            eprintln!("Request failed: {}", e);
            std::process::exit(1);
        });

    let payload = response.payload.unwrap_or_default();
    match (response.status, &args.command) {
        (Status::Ok, Commands::Produce { .. }) => {
            println!("offset: {}", be_u64(&payload[..8.min(payload.len())]));
        }
        (Status::Ok, Commands::Consume { .. }) => {
            let offset = be_u64(&payload[..8.min(payload.len())]);
            let value = String::from_utf8_lossy(payload.get(8..).unwrap_or(&[]));
            println!("offset: {}", offset);
            println!("value: {}", value);
        }
        (Status::Ok, Commands::Offsets) => {
            println!("lowest: {}", be_u64(payload.get(..8).unwrap_or(&[])));
            println!("highest: {}", be_u64(payload.get(8..16).unwrap_or(&[])));
        }
        (Status::Ok, Commands::Ping) => {
            println!("{}", String::from_utf8_lossy(&payload));
        }
        (Status::NotFound, _) => {
            eprintln!("not found: {}", String::from_utf8_lossy(&payload));
            std::process::exit(1);
        }
        (Status::Error, _) => {
            eprintln!("server error: {}", String::from_utf8_lossy(&payload));
            std::process::exit(1);
        }
    }
}

/// Parse a big-endian u64 from a payload slice (0 if too short)
fn be_u64(bytes: &[u8]) -> u64 {
    if bytes.len() < 8 {
        return 0;
    }
    u64::from_be_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}
