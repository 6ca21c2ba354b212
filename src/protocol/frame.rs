//! Frame building and parsing
//!
//! A frame on the wire is the header byte followed by the minimal
//! big-endian encoding of the payload length. The payload itself is
//! opaque to the codec; callers splice it in after the frame bytes.

use crate::error::{FrameError, Result};
use super::header::{byte_width, Header, OPTION_RAW, VERSION_V1};

/// A fully parsed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// The decoded header byte
    pub header: Header,

    /// Declared payload length in bytes
    pub length: u64,

    /// Bytes of input consumed: 1 header byte + `header.width` length
    /// bytes. Anything in the input beyond this offset is payload.
    pub consumed: usize,
}

/// Outcome of attempting to parse a frame header from a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A complete header was parsed.
    Frame(FrameHeader),

    /// The header byte declares a length field that extends past the
    /// end of the buffer: exactly this many more bytes are needed.
    ///
    /// This is a recoverable signal, not a protocol violation: the
    /// caller should read that many more bytes, append them, and
    /// retry the parse. One retry always suffices because the header
    /// byte fully describes the frame header's size (at most 9 bytes).
    NeedMore(usize),
}

/// Build the wire bytes of a frame for a payload of `length` bytes:
/// the header byte plus the minimal big-endian length encoding.
///
/// The length-field width is always derived canonically from `length`,
/// so the result never carries padding bytes.
pub fn build_frame(version: u8, options: u8, length: u64) -> Vec<u8> {
    let width = byte_width(length);
    let header = Header::new(version, options, width);

    let mut frame = Vec::with_capacity(1 + width as usize);
    frame.push(header.encode());
    frame.extend_from_slice(&length.to_be_bytes()[8 - width as usize..]);

    frame
}

/// Attempt to parse a frame header from the front of `buf`.
///
/// At least 2 bytes are required before parsing is attempted at all
/// (header byte + the minimum 1-byte length field); fewer is
/// [`FrameError::InsufficientData`]. An unsupported version or
/// options value is a hard error. A buffer shorter than the declared
/// header size yields [`ParseOutcome::NeedMore`] instead.
///
/// Decoders accept any length encoding matching the declared width,
/// including one with leading zero bytes a canonical encoder would
/// never produce.
pub fn parse_frame_header(buf: &[u8]) -> Result<ParseOutcome> {
    if buf.len() < 2 {
        return Err(FrameError::InsufficientData);
    }

    let header = Header::decode(buf[0]);

    if header.version != VERSION_V1 {
        return Err(FrameError::InvalidVersion(header.version));
    }

    if header.options != OPTION_RAW {
        return Err(FrameError::InvalidOptions(header.options));
    }

    let width = header.width as usize;
    if buf.len() < 1 + width {
        return Ok(ParseOutcome::NeedMore(1 + width - buf.len()));
    }

    // Left-pad the declared length bytes to a full u64.
    let mut be = [0u8; 8];
    be[8 - width..].copy_from_slice(&buf[1..1 + width]);
    let length = u64::from_be_bytes(be);

    Ok(ParseOutcome::Frame(FrameHeader {
        header,
        length,
        consumed: 1 + width,
    }))
}
