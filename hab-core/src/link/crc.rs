//! CRC16-CCITT as used on the radio link.
//!
//! This is the reflected CCITT update with init `0xFFFF` and no final XOR
//! (the classic AVR `_crc_ccitt_update` loop), catalogued as CRC-16/MCRF4XX.

use crc::{CRC_16_MCRF4XX, Crc, Digest};

pub const CRC16_CCITT_INIT: u16 = 0xFFFF;

pub static CRC16_CCITT: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// Running checksum, fed a byte at a time by the decoder.
pub type RunningCrc = Digest<'static, u16>;

pub fn running() -> RunningCrc {
    CRC16_CCITT.digest()
}

pub fn checksum(bytes: &[u8]) -> u16 {
    CRC16_CCITT.checksum(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bit-twiddled update from avr-libc, kept as an interoperability reference.
    fn avr_crc_ccitt_update(crc: u16, data: u8) -> u16 {
        let mut data = data ^ (crc as u8);
        data ^= data << 4;
        (((data as u16) << 8) | (crc >> 8)) ^ ((data >> 4) as u16) ^ ((data as u16) << 3)
    }

    fn reference(bytes: &[u8]) -> u16 {
        bytes
            .iter()
            .fold(CRC16_CCITT_INIT, |crc, &b| avr_crc_ccitt_update(crc, b))
    }

    #[test]
    fn test_check_value() {
        assert_eq!(checksum(b"123456789"), 0x6F91);
    }

    #[test]
    fn test_empty_is_init() {
        assert_eq!(checksum(&[]), CRC16_CCITT_INIT);
    }

    #[test]
    fn test_matches_avr_reference() {
        let vectors: [&[u8]; 5] = [
            b"123456789",
            &[0x01, 0x00],
            &[0x7E, 0x7D, 0x7E, 0x7D],
            &[0xFF; 40],
            b"HAB telemetry frame",
        ];
        for bytes in vectors {
            assert_eq!(checksum(bytes), reference(bytes), "{:02X?}", bytes);
        }
    }

    #[test]
    fn test_running_matches_one_shot() {
        let bytes = b"split across updates";
        let mut digest = running();
        for chunk in bytes.chunks(3) {
            digest.update(chunk);
        }
        assert_eq!(digest.finalize(), checksum(bytes));
    }
}
