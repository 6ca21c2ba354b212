//! framewire CLI Client
//!
//! Sends a message to a framewire server and prints the reply.

use clap::Parser;
use framewire::FrameConnection;
use tracing_subscriber::{fmt, EnvFilter};

/// framewire client
#[derive(Parser, Debug)]
#[command(name = "framewire-cli")]
#[command(about = "Send one framed message and print the reply")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:13338")]
    server: String,

    /// Message to send
    #[arg(default_value = "Hello World")]
    message: String,

    /// Exit without waiting for a reply
    #[arg(long)]
    no_reply: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let conn = match FrameConnection::connect(&args.server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = conn.write(args.message.as_bytes()) {
        eprintln!("Failed to send: {}", e);
        std::process::exit(1);
    }

    if !args.no_reply {
        match conn.read() {
            Ok(reply) => match String::from_utf8(reply) {
                Ok(text) => println!("{}", text),
                Err(e) => println!("{} bytes (not UTF-8)", e.as_bytes().len()),
            },
            Err(e) => {
                eprintln!("Failed to read reply: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = conn.close() {
        eprintln!("Failed to close connection: {}", e);
        std::process::exit(1);
    }
}
