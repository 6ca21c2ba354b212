//! Header byte packing
//!
//! The header is a single byte with three bit-packed fields. Packing
//! and unpacking are total functions: every byte value decodes to
//! *some* header, and any field value can be encoded. Whether the
//! decoded version and options are actually supported is judged by
//! the frame parser, not here.

/// The only protocol version currently on the wire.
///
/// Versions are mutually exclusive: a decoder must reject any other
/// value rather than attempt cross-version interpretation.
pub const VERSION_V1: u8 = 0;

/// The only supported payload encoding: bytes are sent verbatim.
///
/// The remaining option values are reserved for future codecs.
pub const OPTION_RAW: u8 = 0;

/// A decoded frame header: version, options, and the width in bytes
/// of the length field that follows the header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Protocol version (3 bits on the wire)
    pub version: u8,

    /// Payload encoding option (2 bits on the wire)
    pub options: u8,

    /// Width of the length field in bytes, 1-8 (stored as width-1 in
    /// 3 bits on the wire)
    pub width: u8,
}

impl Header {
    /// Build a header for the given length-field width.
    pub fn new(version: u8, options: u8, width: u8) -> Self {
        Self {
            version,
            options,
            width,
        }
    }

    /// Pack the header into its wire byte.
    ///
    /// Layout: `version << 5 | options << 3 | (width - 1)`. A width of
    /// 0 is treated as 1, the minimum. Fields wider than their bit
    /// allocation are masked down, so encoding is total.
    pub fn encode(&self) -> u8 {
        let width = if self.width == 0 { 1 } else { self.width };

        let mut raw = self.version & 0x7;
        raw = raw << 2 | (self.options & 0x3);
        raw = raw << 3 | ((width - 1) & 0x7);

        raw
    }

    /// Unpack a wire byte into a header.
    ///
    /// Total over all 256 byte values; `width` is always in 1..=8.
    pub fn decode(raw: u8) -> Self {
        Self {
            version: (raw >> 5) & 0x7,
            options: (raw >> 3) & 0x3,
            width: (raw & 0x7) + 1,
        }
    }
}

/// Minimum number of bytes needed to hold `n` big-endian with no
/// leading zero byte. Always in 1..=8; zero takes one byte, never
/// zero bytes.
pub fn byte_width(n: u64) -> u8 {
    if n == 0 {
        return 1;
    }

    let mut n = n;
    let mut bytes = 0u8;

    while n != 0 {
        n >>= 8;
        bytes += 1;
    }

    bytes
}
