//! HDLC-style framing for the serial radio link.
//!
//! Wire format, before byte stuffing of everything between the flags:
//!
//! ```text
//! 0x7E | CMD | LEN | PAYLOAD (LEN bytes) | CRC_LO | CRC_HI | 0x7E
//! ```
//!
//! Any `0x7E` or `0x7D` between the flags is sent as `0x7D, byte ^ 0x20`.
//! The CRC is CRC16-CCITT (init `0xFFFF`) over `CMD | LEN | PAYLOAD`.

pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod frame;

pub use decoder::{FrameDecoder, FrameHandler, Frames, LinkStats};
pub use encoder::{EncodedFrame, encode, encode_into};
pub use frame::{Frame, LinkError};

/// Opens and closes every frame.
pub const FRAME_FLAG: u8 = 0x7E;
/// Marks the next byte as stuffed.
pub const CONTROL_ESCAPE: u8 = 0x7D;
/// XOR applied to a stuffed byte.
pub const ESCAPE_MASK: u8 = 0x20;

/// Upper bound on payload plus CRC, before stuffing.
pub const MAX_FRAME_LENGTH: usize = 64;
pub const HEADER_LENGTH: usize = 2;
pub const CRC_LENGTH: usize = 2;
pub const MAX_PAYLOAD_LENGTH: usize = MAX_FRAME_LENGTH - CRC_LENGTH;

/// Unstuffed bytes the decoder may accumulate between two flags.
pub const FRAME_BUFFER_CAPACITY: usize = HEADER_LENGTH + MAX_FRAME_LENGTH;

/// Worst case on the wire: every byte stuffed, plus both flags.
pub const MAX_ENCODED_LENGTH: usize = 2 + 2 * FRAME_BUFFER_CAPACITY;
