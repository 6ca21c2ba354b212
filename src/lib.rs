//! # framewire
//!
//! A length-prefixed message framing protocol over TCP:
//! - Compact binary header: one byte packing version, options, and
//!   length-field width, followed by 1-8 big-endian length bytes
//! - Message-oriented reads over a stream transport: each `read()`
//!   returns exactly one complete payload, regardless of how the
//!   stream chunks the bytes
//! - Leftover-buffer carryover so over-read bytes are never dropped
//!   between messages
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                                │
//! │            write(payload)       read() -> payload            │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//! ┌──────────▼──────────────────────────────────▼───────────────┐
//! │                     FrameConnection                          │
//! │        (leftover buffer, bounded chunked reads)              │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!     ┌──────▼──────┐                    ┌──────▼──────┐
//!     │ Frame Codec │                    │  TcpStream  │
//!     │  (no I/O)   │                    │  (duplex)   │
//!     └─────────────┘                    └─────────────┘
//! ```
//!
//! ## Wire Format
//!
//! ```text
//! ┌────────────────────────┬───────────────────┬────────────────┐
//! │ [ver:3][opt:2][w-1:3]  │  length (w bytes) │    payload     │
//! │        1 byte          │    big-endian     │ `length` bytes │
//! └────────────────────────┴───────────────────┴────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod net;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FrameError, Result};
pub use config::Config;
pub use net::{FrameConnection, FrameListener};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of framewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
