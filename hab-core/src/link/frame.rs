use super::{HEADER_LENGTH, MAX_PAYLOAD_LENGTH};
use heapless::Vec;

/// A logical link message: one command byte plus up to
/// [`MAX_PAYLOAD_LENGTH`] bytes of payload.
///
/// The length byte on the wire is always `payload.len()`; it is derived here
/// rather than stored so the two can never disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    command: u8,
    payload: Vec<u8, MAX_PAYLOAD_LENGTH>,
}

impl Frame {
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, LinkError> {
        let payload =
            Vec::from_slice(payload).map_err(|_| LinkError::PayloadTooLong(payload.len()))?;
        Ok(Self { command, payload })
    }

    pub const fn empty(command: u8) -> Self {
        Self {
            command,
            payload: Vec::new(),
        }
    }

    pub const fn command(&self) -> u8 {
        self.command
    }

    pub fn length(&self) -> u8 {
        // Bounded by MAX_PAYLOAD_LENGTH, always fits.
        self.payload.len() as u8
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub(crate) fn header(&self) -> [u8; HEADER_LENGTH] {
        [self.command, self.length()]
    }

    /// Rebuilds a frame from `CMD | LEN | PAYLOAD` with the CRC already stripped.
    pub(crate) fn from_body(body: &[u8]) -> Result<Self, LinkError> {
        let [command, length, payload @ ..] = body else {
            return Err(LinkError::Truncated);
        };
        if *length as usize != payload.len() {
            return Err(LinkError::LengthMismatch {
                declared: *length,
                actual: payload.len(),
            });
        }
        Self::new(*command, payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    #[error("payload of {0} bytes exceeds the frame limit")]
    PayloadTooLong(usize),
    #[error("frame too short to hold a header and CRC")]
    Truncated,
    #[error("CRC mismatch: computed {computed:#06x}, received {received:#06x}")]
    CrcMismatch { computed: u16, received: u16 },
    #[error("length byte {declared} does not match {actual} payload bytes")]
    LengthMismatch { declared: u8, actual: usize },
    #[error("unknown command {0:#04x}")]
    UnknownCommand(u8),
    #[error("payload does not decode for its command")]
    MalformedPayload,
}
