use super::crc;
use super::frame::Frame;
use super::{CONTROL_ESCAPE, ESCAPE_MASK, FRAME_FLAG, MAX_ENCODED_LENGTH};
use heapless::Vec;

/// One frame as it goes on the wire, flags included.
pub type EncodedFrame = Vec<u8, MAX_ENCODED_LENGTH>;

/// Encodes a frame into a buffer sized for the worst case.
pub fn encode(frame: &Frame) -> EncodedFrame {
    let mut out = EncodedFrame::new();
    encode_into(frame, |byte| {
        // Capacity covers a frame with every byte stuffed.
        let pushed = out.push(byte);
        debug_assert!(pushed.is_ok(), "encoded frame exceeds MAX_ENCODED_LENGTH");
    });
    out
}

/// Streams the encoded frame to `sink` one byte at a time, e.g. straight
/// into a UART transmit loop.
pub fn encode_into<F: FnMut(u8)>(frame: &Frame, mut sink: F) {
    let header = frame.header();

    let mut digest = crc::running();
    digest.update(&header);
    digest.update(frame.payload());
    let crc_bytes = digest.finalize().to_le_bytes();

    sink(FRAME_FLAG);
    for &byte in header.iter().chain(frame.payload()).chain(&crc_bytes) {
        stuff(byte, &mut sink);
    }
    sink(FRAME_FLAG);
}

fn stuff<F: FnMut(u8)>(byte: u8, sink: &mut F) {
    if byte == FRAME_FLAG || byte == CONTROL_ESCAPE {
        sink(CONTROL_ESCAPE);
        sink(byte ^ ESCAPE_MASK);
    } else {
        sink(byte);
    }
}
