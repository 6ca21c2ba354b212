//! Framed Connection
//!
//! Wraps a duplex TCP stream into a message-oriented socket: `write`
//! sends one framed payload, `read` blocks until exactly one complete
//! payload has been assembled from the stream, however the transport
//! chunks it.
//!
//! The stream delivers bytes with no regard for frame boundaries, so
//! any read may return bytes belonging to the *next* frame. Those
//! over-read bytes are retained in a leftover buffer that survives
//! across `read` calls and is always drained before the stream is
//! touched again; dropping them would lose data at frame boundaries
//! under pipelined writes.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bytes::{Buf, BytesMut};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{FrameError, Result};
use crate::protocol::{
    build_frame, parse_frame_header, ParseOutcome, OPTION_RAW, VERSION_V1,
};

/// Read-side state: the stream handle plus the buffers that carry
/// partially assembled data between calls.
struct ReadHalf {
    /// TCP stream read handle
    stream: TcpStream,

    /// Bytes already pulled from the stream but not yet consumed by a
    /// logical read. Served (and drained front-first) before any new
    /// stream read.
    leftover: BytesMut,

    /// Scratch buffer each stream read lands in before being split
    /// between the current need and the leftover
    scratch: Vec<u8>,

    /// Cap on a single internal read request
    capacity: usize,
}

/// Write-side state
struct WriteHalf {
    stream: TcpStream,
}

/// A message-oriented connection over TCP.
///
/// Read and write paths touch disjoint state and are guarded by
/// independent locks, so one read and one write may proceed
/// concurrently (full duplex). Two concurrent reads, or two
/// concurrent writes, serialize against each other.
///
/// Any fatal error (I/O failure, short write, protocol violation,
/// buffer overrun) closes the connection; every later operation fails
/// with [`FrameError::ConnectionClosed`].
pub struct FrameConnection {
    reader: Mutex<ReadHalf>,
    writer: Mutex<WriteHalf>,

    /// Set once a fatal error has torn the connection down
    closed: AtomicBool,

    /// Peer address for logging
    peer_addr: String,
}

impl FrameConnection {
    /// Connect to a remote host speaking the framing protocol.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        Self::connect_with_config(addr, &Config::default())
    }

    /// Connect with explicit configuration.
    pub fn connect_with_config(addr: impl ToSocketAddrs, config: &Config) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        Self::from_stream(stream, config)
    }

    /// Wrap an already established stream.
    ///
    /// A freshly wrapped connection starts with an empty leftover
    /// buffer and is immediately ready for `read`/`write`.
    pub fn from_stream(stream: TcpStream, config: &Config) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(config.nodelay)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connection established with {}", peer_addr);

        Ok(Self {
            reader: Mutex::new(ReadHalf {
                stream: read_stream,
                leftover: BytesMut::new(),
                scratch: vec![0u8; config.read_buffer_capacity],
                capacity: config.read_buffer_capacity,
            }),
            writer: Mutex::new(WriteHalf {
                stream: write_stream,
            }),
            closed: AtomicBool::new(false),
            peer_addr,
        })
    }

    /// Send one payload as a single frame.
    ///
    /// Writes the frame bytes (header + length field), then the
    /// payload, each checked for short writes. The protocol cannot
    /// resume a partially written frame, so a short write or I/O
    /// error closes the connection and surfaces the error.
    pub fn write(&self, payload: &[u8]) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(FrameError::ConnectionClosed);
        }

        let mut writer = self.writer.lock();
        match writer.write_frame(payload) {
            Ok(()) => {
                tracing::trace!("Sent {} byte message to {}", payload.len(), self.peer_addr);
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Write to {} failed: {}", self.peer_addr, e);
                self.closed.store(true, Ordering::Release);
                let _ = writer.stream.shutdown(Shutdown::Both);
                Err(e)
            }
        }
    }

    /// Receive exactly one complete message payload.
    ///
    /// Blocks until the full message has arrived. Over-read bytes
    /// belonging to subsequent frames are kept for the next call. Any
    /// error closes the connection: a failed read leaves the stream
    /// position inside a frame, beyond recovery.
    pub fn read(&self) -> Result<Vec<u8>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(FrameError::ConnectionClosed);
        }

        let mut reader = self.reader.lock();
        match reader.read_message() {
            Ok(payload) => {
                tracing::trace!(
                    "Received {} byte message from {}",
                    payload.len(),
                    self.peer_addr
                );
                Ok(payload)
            }
            Err(e) => {
                tracing::debug!("Read from {} failed: {}", self.peer_addr, e);
                self.closed.store(true, Ordering::Release);
                let _ = reader.stream.shutdown(Shutdown::Both);
                Err(e)
            }
        }
    }

    /// Close the connection. Idempotent; best-effort on the stream.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        tracing::debug!("Closing connection with {}", self.peer_addr);

        let reader = self.reader.lock();
        match reader.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Peer already gone; close still succeeds
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the connection has been closed, by `close` or by a
    /// fatal error.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl WriteHalf {
    fn write_frame(&mut self, payload: &[u8]) -> Result<()> {
        let frame = build_frame(VERSION_V1, OPTION_RAW, payload.len() as u64);

        let written = self.stream.write(&frame)?;
        if written != frame.len() {
            return Err(FrameError::ShortWrite {
                expected: frame.len(),
                written,
            });
        }

        let written = self.stream.write(payload)?;
        if written != payload.len() {
            return Err(FrameError::ShortWrite {
                expected: payload.len(),
                written,
            });
        }

        self.stream.flush()?;
        Ok(())
    }
}

impl ReadHalf {
    /// Assemble one complete message from the stream.
    fn read_message(&mut self) -> Result<Vec<u8>> {
        // Minimum parsable header: header byte + 1 length byte.
        let mut head = self.read_exact_bytes(2)?;

        let frame = match parse_frame_header(&head)? {
            ParseOutcome::Frame(f) => f,
            ParseOutcome::NeedMore(n) => {
                let rest = self.read_exact_bytes(n)?;
                head.extend_from_slice(&rest);

                match parse_frame_header(&head)? {
                    ParseOutcome::Frame(f) => f,
                    // The header byte fixes the header size, so a
                    // second shortfall cannot happen with the bytes
                    // appended above.
                    ParseOutcome::NeedMore(_) => return Err(FrameError::InsufficientData),
                }
            }
        };

        let total = usize::try_from(frame.length)
            .map_err(|_| FrameError::PayloadTooLarge(frame.length))?;

        // The declared length is peer-controlled; cap the up-front
        // allocation at one chunk and let the vector grow with data
        // actually received.
        let mut payload = Vec::with_capacity(total.min(self.capacity));

        // Header bytes past `consumed` are already payload.
        if head.len() > frame.consumed {
            payload.extend_from_slice(&head[frame.consumed..]);
        }

        while payload.len() < total {
            let chunk = (total - payload.len()).min(self.capacity);
            let bytes = self.read_exact_bytes(chunk)?;
            payload.extend_from_slice(&bytes);
        }

        Ok(payload)
    }

    /// Produce exactly `n` bytes, draining the leftover buffer before
    /// touching the stream. Each stream read lands in the scratch
    /// buffer and is split between the current need and the leftover;
    /// surplus bytes are never dropped.
    fn read_exact_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        if n > self.capacity {
            return Err(FrameError::BufferExceeded {
                requested: n,
                capacity: self.capacity,
            });
        }

        let mut out = Vec::with_capacity(n);

        if !self.leftover.is_empty() {
            let take = n.min(self.leftover.len());
            out.extend_from_slice(&self.leftover[..take]);
            self.leftover.advance(take);
        }

        while out.len() < n {
            let got = self.stream.read(&mut self.scratch)?;
            if got == 0 {
                return Err(FrameError::Io(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "stream closed mid-message",
                )));
            }

            let take = (n - out.len()).min(got);
            out.extend_from_slice(&self.scratch[..take]);

            if got > take {
                self.leftover.extend_from_slice(&self.scratch[take..got]);
            }
        }

        Ok(out)
    }
}
