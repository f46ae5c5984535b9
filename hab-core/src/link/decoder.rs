use super::crc::{self, RunningCrc};
use super::frame::{Frame, LinkError};
use super::{CONTROL_ESCAPE, CRC_LENGTH, ESCAPE_MASK, FRAME_BUFFER_CAPACITY, FRAME_FLAG};
use crate::debug;
use core::iter::FusedIterator;
use heapless::Vec;

/// Receives frames from the decoder, once per validated frame, in order.
pub trait FrameHandler {
    fn handle_frame(&mut self, frame: Frame);
}

impl<F: FnMut(Frame)> FrameHandler for F {
    fn handle_frame(&mut self, frame: Frame) {
        self(frame)
    }
}

/// Receive-side counters, for health telemetry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    pub frames_delivered: u32,
    pub crc_errors: u32,
    pub malformed_frames: u32,
    pub overflows: u32,
}

/// Streaming frame decoder.
///
/// Bytes can arrive in chunks of any size; the decoder carries the partial
/// frame and any pending escape across calls. Corrupt, truncated and
/// oversized frames are dropped and decoding resumes at the next flag.
pub struct FrameDecoder {
    buffer: Vec<u8, FRAME_BUFFER_CAPACITY>,
    /// Covers every buffered byte except the last two, which are the CRC
    /// once the closing flag arrives.
    crc: RunningCrc,
    escape_pending: bool,
    stats: LinkStats,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            crc: crc::running(),
            escape_pending: false,
            stats: LinkStats::default(),
        }
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Decodes `bytes`, yielding frames as the iterator is advanced.
    ///
    /// Every byte is consumed even if the iterator is dropped early; frames
    /// completed after that point still count in [`LinkStats`] but are not
    /// returned.
    pub fn feed<'d, 'i>(&'d mut self, bytes: &'i [u8]) -> Frames<'d, 'i> {
        Frames {
            decoder: self,
            bytes: bytes.iter(),
        }
    }

    /// Decodes all of `bytes`, handing each frame to `handler`.
    pub fn feed_into<H: FrameHandler + ?Sized>(&mut self, bytes: &[u8], handler: &mut H) {
        for frame in self.feed(bytes) {
            handler.handle_frame(frame);
        }
    }

    /// Processes a single byte from the link.
    pub fn push_byte(&mut self, byte: u8) -> Option<Frame> {
        if self.escape_pending {
            self.escape_pending = false;
            self.append(byte ^ ESCAPE_MASK);
            return None;
        }

        match byte {
            CONTROL_ESCAPE => {
                self.escape_pending = true;
                None
            }
            FRAME_FLAG => self.close_frame(),
            _ => {
                self.append(byte);
                None
            }
        }
    }

    fn append(&mut self, byte: u8) {
        if self.buffer.push(byte).is_err() {
            self.stats.overflows = self.stats.overflows.wrapping_add(1);
            debug!("Link frame overflow, dropping {} bytes", self.buffer.len());
            self.reset();
            return;
        }

        let len = self.buffer.len();
        if len > CRC_LENGTH {
            let lagged = self.buffer[len - 1 - CRC_LENGTH];
            self.crc.update(&[lagged]);
        }
    }

    fn close_frame(&mut self) -> Option<Frame> {
        // Back-to-back flags: one frame's close is the next one's open.
        if self.buffer.is_empty() {
            self.reset();
            return None;
        }

        let result = self.validate();
        self.reset();

        match result {
            Ok(frame) => {
                self.stats.frames_delivered = self.stats.frames_delivered.wrapping_add(1);
                Some(frame)
            }
            Err(err) => {
                match err {
                    LinkError::CrcMismatch { .. } => {
                        self.stats.crc_errors = self.stats.crc_errors.wrapping_add(1)
                    }
                    _ => {
                        self.stats.malformed_frames = self.stats.malformed_frames.wrapping_add(1)
                    }
                }
                debug!("Dropped link frame: {:?}", err);
                None
            }
        }
    }

    fn validate(&self) -> Result<Frame, LinkError> {
        let len = self.buffer.len();
        if len < CRC_LENGTH {
            return Err(LinkError::Truncated);
        }

        let (body, trailer) = self.buffer.split_at(len - CRC_LENGTH);
        let received = u16::from_le_bytes([trailer[0], trailer[1]]);
        let computed = self.crc.clone().finalize();
        if computed != received {
            return Err(LinkError::CrcMismatch { computed, received });
        }

        Frame::from_body(body)
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.crc = crc::running();
        self.escape_pending = false;
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames decoded from one [`FrameDecoder::feed`] call.
#[must_use = "frames are only returned as the iterator is consumed"]
pub struct Frames<'d, 'i> {
    decoder: &'d mut FrameDecoder,
    bytes: core::slice::Iter<'i, u8>,
}

impl Iterator for Frames<'_, '_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        for &byte in self.bytes.by_ref() {
            if let Some(frame) = self.decoder.push_byte(byte) {
                return Some(frame);
            }
        }
        None
    }
}

impl FusedIterator for Frames<'_, '_> {}

impl Drop for Frames<'_, '_> {
    fn drop(&mut self) {
        // Keep framing state in step with the input.
        for &byte in self.bytes.by_ref() {
            let _ = self.decoder.push_byte(byte);
        }
    }
}
