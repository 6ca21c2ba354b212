//! Network Module
//!
//! TCP connection and listener wrappers speaking the framing protocol.
//!
//! ## Architecture
//! - `FrameConnection` owns one duplex stream plus the leftover buffer
//! - Reads assemble exactly one message per call
//! - Writes send one frame per call
//! - Any fatal error closes the connection for good

mod connection;
mod listener;

pub use connection::FrameConnection;
pub use listener::FrameListener;
