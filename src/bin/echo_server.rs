//! framewire Echo Server Binary
//!
//! Listens for framed connections and echoes every received message
//! back to its sender.

use std::io::ErrorKind;
use std::thread;

use clap::Parser;
use framewire::{Config, FrameConnection, FrameError, FrameListener};
use tracing_subscriber::{fmt, EnvFilter};

/// framewire echo server
#[derive(Parser, Debug)]
#[command(name = "framewire-echo")]
#[command(about = "Echo server speaking the framewire protocol")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:13338")]
    listen: String,

    /// Internal read buffer capacity in KiB
    #[arg(short, long, default_value = "1024")]
    buffer_kib: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,framewire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("framewire echo server v{}", framewire::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .read_buffer_capacity(args.buffer_kib * 1024)
        .build();

    let listener = match FrameListener::bind_with_config(&args.listen, config) {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    loop {
        match listener.accept() {
            Ok(conn) => {
                thread::spawn(move || {
                    if let Err(e) = serve(&conn) {
                        tracing::warn!("Connection to {} ended with error: {}", conn.peer_addr(), e);
                    }
                });
            }
            Err(e) => {
                tracing::error!("Accept failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Echo messages until the client disconnects.
fn serve(conn: &FrameConnection) -> framewire::Result<()> {
    loop {
        let message = match conn.read() {
            Ok(m) => m,
            Err(FrameError::Io(ref e)) if e.kind() == ErrorKind::UnexpectedEof => {
                // Client disconnected gracefully
                tracing::debug!("Client {} disconnected", conn.peer_addr());
                return Ok(());
            }
            Err(FrameError::Io(ref e)) if e.kind() == ErrorKind::ConnectionReset => {
                tracing::debug!("Connection reset by client {}", conn.peer_addr());
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        tracing::debug!("Echoing {} bytes to {}", message.len(), conn.peer_addr());
        conn.write(&message)?;
    }
}
