use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// One direction of a noisy serial radio.
///
/// Bytes go in whole frames at a time and come out in chunks of random size,
/// with each bit independently flipped at `bit_error_rate`.
pub struct LossyLink {
    rng: StdRng,
    bit_error_rate: f64,
    max_chunk: usize,
    in_flight: VecDeque<u8>,
    pub bytes_sent: u64,
    pub bits_flipped: u64,
}

impl LossyLink {
    pub fn new(seed: u64, bit_error_rate: f64, max_chunk: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            bit_error_rate: bit_error_rate.clamp(0.0, 1.0),
            max_chunk: max_chunk.max(1),
            in_flight: VecDeque::new(),
            bytes_sent: 0,
            bits_flipped: 0,
        }
    }

    pub fn transmit(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let mut received = byte;
            if self.bit_error_rate > 0.0 {
                for bit in 0..8 {
                    if self.rng.gen_bool(self.bit_error_rate) {
                        received ^= 1 << bit;
                        self.bits_flipped += 1;
                    }
                }
            }
            self.in_flight.push_back(received);
        }
        self.bytes_sent += bytes.len() as u64;
    }

    /// Next burst of bytes as the receiver's UART would see it.
    pub fn receive_chunk(&mut self) -> Option<Vec<u8>> {
        if self.in_flight.is_empty() {
            return None;
        }
        let n = self
            .rng
            .gen_range(1..=self.max_chunk)
            .min(self.in_flight.len());
        Some(self.in_flight.drain(..n).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hab_core::{Frame, FrameDecoder, encode};

    fn drain(link: &mut LossyLink) -> Vec<Vec<u8>> {
        std::iter::from_fn(|| link.receive_chunk()).collect()
    }

    #[test]
    fn test_clean_link_delivers_bytes_in_order() {
        let mut link = LossyLink::new(1, 0.0, 5);
        let sent: Vec<u8> = (0..=255).collect();
        link.transmit(&sent);

        let chunks = drain(&mut link);
        assert!(chunks.iter().all(|c| (1..=5).contains(&c.len())));
        assert_eq!(chunks.concat(), sent);
        assert_eq!(link.bits_flipped, 0);
    }

    #[test]
    fn test_certain_error_inverts_every_bit() {
        let mut link = LossyLink::new(1, 1.0, 64);
        link.transmit(&[0x00, 0xFF, 0x7E]);
        assert_eq!(drain(&mut link).concat(), [0xFF, 0x00, 0x81]);
        assert_eq!(link.bits_flipped, 24);
    }

    #[test]
    fn test_decoder_survives_chunking() {
        let mut link = LossyLink::new(9, 0.0, 7);
        let frames: Vec<Frame> = (0..20u8)
            .map(|i| Frame::new(i, &[0x7E, i, 0x7D]).unwrap())
            .collect();
        for frame in &frames {
            link.transmit(&encode(frame));
        }

        let mut decoder = FrameDecoder::new();
        let mut received = Vec::new();
        while let Some(chunk) = link.receive_chunk() {
            received.extend(decoder.feed(&chunk));
        }
        assert_eq!(received, frames);
    }

    #[test]
    fn test_noisy_link_never_delivers_garbage() {
        let mut link = LossyLink::new(4, 0.005, 16);
        let frame = Frame::new(0x01, b"telemetry goes here").unwrap();
        for _ in 0..200 {
            link.transmit(&encode(&frame));
        }

        let mut decoder = FrameDecoder::new();
        while let Some(chunk) = link.receive_chunk() {
            for received in decoder.feed(&chunk) {
                assert_eq!(received, frame);
            }
        }
        let stats = decoder.stats();
        assert!(stats.frames_delivered > 0);
        assert!(stats.crc_errors + stats.malformed_frames > 0);
    }
}
