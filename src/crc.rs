//! Frame checksum.
//!
//! The gauge protects every frame with CRC-8, polynomial x^8 + x^2 + x + 1,
//! zero initial value, no reflection and no final XOR (the SMBus PEC
//! parameter set). The table-less implementation is used: frames are at most
//! five bytes long, so the bit-serial loop is cheaper than carrying a lookup
//! table in flash.

use crc::{Crc, NoTable, CRC_8_SMBUS};

/// x^8 + x^2 + x + 1
pub const POLYNOMIAL: u8 = CRC_8_SMBUS.poly;

static CRC8: Crc<u8, NoTable> = Crc::<u8, NoTable>::new(&CRC_8_SMBUS);

/// Computes the checksum of `data`.
///
/// ```rust
/// # use lc709203f::crc::crc8;
/// assert_eq!(crc8(&[]), 0);
/// assert_eq!(crc8(b"123456789"), 0xF4);
/// assert_eq!(crc8(&[0x04, 0x55, 0xAA]), 0xB9);
/// ```
pub fn crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

#[cfg(test)]
mod test {
    use super::*;

    /// Bit-serial, MSB-first CRC-8 written out step by step.
    fn reference_crc8(data: &[u8]) -> u8 {
        let mut crc = 0u8;
        for &byte in data {
            crc ^= byte;
            for _ in 0..8 {
                if crc & 0x80 != 0 {
                    crc = (crc << 1) ^ POLYNOMIAL;
                } else {
                    crc <<= 1;
                }
            }
        }
        crc
    }

    #[test]
    fn polynomial_is_0x07() {
        assert_eq!(POLYNOMIAL, 0x07);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(crc8(&[]), 0);
    }

    #[test]
    fn zero_byte_is_zero() {
        assert_eq!(crc8(&[0]), 0);
    }

    #[test]
    fn known_vectors() {
        #[rustfmt::skip]
        let table: [(&[u8], u8); 7] = [
            (b"123456789", 0xF4),
            // command frames sent with the default payloads
            (&[0x04, 0x55, 0xAA], 0xB9),
            (&[0x06, 0x34, 0x0D], 0xF3),
            (&[0x07, 0x55, 0xAA], 0x04),
            (&[0x08, 0xA6, 0x0B], 0x06),
            (&[0x0C, 0x1E, 0x00], 0x7B),
            // datasheet example: write 0x0001 to IC Power Mode, address included
            (&[0x16, 0x15, 0x01, 0x00], 0x64),
        ];

        for (data, expected) in table {
            assert_eq!(crc8(data), expected, "crc8({data:02X?})");
        }
    }

    #[test]
    fn matches_reference_for_every_single_byte() {
        for byte in 0..=u8::MAX {
            assert_eq!(crc8(&[byte]), reference_crc8(&[byte]));
        }
    }

    #[test]
    fn matches_reference_for_every_word() {
        for value in 0..=u16::MAX {
            let data = value.to_le_bytes();
            assert_eq!(crc8(&data), reference_crc8(&data));
        }
    }

    #[test]
    fn is_deterministic() {
        let frame = [0x13, 0x08, 0x00];
        assert_eq!(crc8(&frame), crc8(&frame));
        assert_eq!(crc8(&frame), 0xB7);
    }
}
