//! Error types for framewire
//!
//! Provides a unified error type for all operations.
//!
//! "Need more bytes" during header parsing is deliberately *not* an
//! error variant: it is the recoverable arm of
//! [`crate::protocol::ParseOutcome`], because it must trigger a
//! follow-up read rather than connection teardown.

use thiserror::Error;

/// Result type alias using FrameError
pub type Result<T> = std::result::Result<T, FrameError>;

/// Unified error type for framewire operations
///
/// Every variant except `Io` wrapping a caller-applied timeout is
/// fatal to the connection it occurred on: the connection is closed
/// and must not be reused.
#[derive(Debug, Error)]
pub enum FrameError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("insufficient data for frame header")]
    InsufficientData,

    #[error("invalid header version: {0}")]
    InvalidVersion(u8),

    #[error("invalid header options: {0}")]
    InvalidOptions(u8),

    #[error("declared payload length {0} exceeds addressable memory")]
    PayloadTooLarge(u64),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("short write: wanted to write {expected} bytes but wrote {written}")]
    ShortWrite { expected: usize, written: usize },

    #[error("read of {requested} bytes exceeds buffer capacity of {capacity}")]
    BufferExceeded { requested: usize, capacity: usize },

    #[error("connection closed")]
    ConnectionClosed,
}
