//! Frame Codec
//!
//! Pure encoding and decoding for the wire protocol. No I/O happens
//! here; the connection layer feeds byte slices in and acts on the
//! structured results.
//!
//! ## Wire Format (all integers big-endian)
//!
//! ```text
//! ┌────────────────────────┬───────────────────┬────────────────┐
//! │ [ver:3][opt:2][w-1:3]  │  length (w bytes) │    payload     │
//! │        1 byte          │    big-endian     │ `length` bytes │
//! └────────────────────────┴───────────────────┴────────────────┘
//! ```
//!
//! - `ver`: protocol version, only [`VERSION_V1`] (0) is valid
//! - `opt`: payload encoding, only [`OPTION_RAW`] (0) is valid
//! - `w-1`: width of the length field minus one, so widths 1-8 fit
//!   in three bits
//!
//! The length field always uses the *minimum* number of bytes needed
//! to represent the payload length; a zero-length payload still takes
//! one (zero) length byte.

mod header;
mod frame;

pub use header::{byte_width, Header, OPTION_RAW, VERSION_V1};
pub use frame::{build_frame, parse_frame_header, FrameHeader, ParseOutcome};
