//! Wire format of a single gauge transaction.
//!
//! A command is `[command, data-low, data-high, crc]`, a response is
//! `[data-low, data-high, crc]`. Read-only registers are selected with the
//! bare command byte.

use crate::crc::crc8;

/// 7-bit bus address of the gauge.
pub const DEVICE_ADDR: u8 = 0x0B;

/// Address byte on the wire for a write transfer.
pub const WRITE_ADDR: u8 = DEVICE_ADDR << 1;

/// Address byte on the wire for a read transfer.
pub const READ_ADDR: u8 = WRITE_ADDR | 1;

pub const COMMAND_LEN: usize = 4;
pub const RESPONSE_LEN: usize = 3;

/// Which bytes the checksum covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcScope {
    /// Commands: `[command, lo, hi]`. Responses: `[lo, hi]`.
    #[default]
    Frame,

    /// SMBus packet error checking: the address bytes seen on the wire are
    /// included. Commands: `[addr_w, command, lo, hi]`. Responses:
    /// `[addr_w, command, addr_r, lo, hi]`.
    Smbus,
}

impl CrcScope {
    pub fn command_crc(self, command: u8, lo: u8, hi: u8) -> u8 {
        match self {
            CrcScope::Frame => crc8(&[command, lo, hi]),
            CrcScope::Smbus => crc8(&[WRITE_ADDR, command, lo, hi]),
        }
    }

    pub fn response_crc(self, command: u8, lo: u8, hi: u8) -> u8 {
        match self {
            CrcScope::Frame => crc8(&[lo, hi]),
            CrcScope::Smbus => crc8(&[WRITE_ADDR, command, READ_ADDR, lo, hi]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    InvalidLength { expected: usize, actual: usize },
    ChecksumMismatch { expected: u8, received: u8 },
}

/// Composes a register value from its little-endian halves.
///
/// ```rust
/// # use lc709203f::frame::decode_word;
/// assert_eq!(decode_word(0x34, 0x0D), 0x0D34);
/// ```
#[inline]
pub const fn decode_word(lo: u8, hi: u8) -> u16 {
    ((hi as u16) << 8) | lo as u16
}

/// Splits a register value into `(lo, hi)`.
///
/// ```rust
/// # use lc709203f::frame::encode_word;
/// assert_eq!(encode_word(0xAA55), (0x55, 0xAA));
/// ```
#[inline]
pub const fn encode_word(value: u16) -> (u8, u8) {
    (value as u8, (value >> 8) as u8)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandFrame {
    bytes: [u8; COMMAND_LEN],
}

impl CommandFrame {
    pub fn new(command: u8, value: u16, scope: CrcScope) -> Self {
        let (lo, hi) = encode_word(value);
        Self {
            bytes: [command, lo, hi, scope.command_crc(command, lo, hi)],
        }
    }

    /// Parses a frame as the device would receive it.
    pub fn parse(bytes: &[u8], scope: CrcScope) -> Result<Self, FrameError> {
        let bytes: [u8; COMMAND_LEN] =
            bytes.try_into().map_err(|_| FrameError::InvalidLength {
                expected: COMMAND_LEN,
                actual: bytes.len(),
            })?;

        let [command, lo, hi, received] = bytes;
        let expected = scope.command_crc(command, lo, hi);
        if expected != received {
            return Err(FrameError::ChecksumMismatch { expected, received });
        }

        Ok(Self { bytes })
    }

    pub const fn command(&self) -> u8 {
        self.bytes[0]
    }

    pub const fn value(&self) -> u16 {
        decode_word(self.bytes[1], self.bytes[2])
    }

    pub const fn checksum(&self) -> u8 {
        self.bytes[3]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseFrame {
    bytes: [u8; RESPONSE_LEN],
}

impl ResponseFrame {
    /// Builds the response the device sends for `command`.
    pub fn new(command: u8, value: u16, scope: CrcScope) -> Self {
        let (lo, hi) = encode_word(value);
        Self {
            bytes: [lo, hi, scope.response_crc(command, lo, hi)],
        }
    }

    pub const fn from_bytes(bytes: [u8; RESPONSE_LEN]) -> Self {
        Self { bytes }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        bytes
            .try_into()
            .map(Self::from_bytes)
            .map_err(|_| FrameError::InvalidLength {
                expected: RESPONSE_LEN,
                actual: bytes.len(),
            })
    }

    pub const fn value(&self) -> u16 {
        decode_word(self.bytes[0], self.bytes[1])
    }

    pub const fn checksum(&self) -> u8 {
        self.bytes[2]
    }

    /// Checks the trailing checksum and returns the value on success.
    pub fn verify(&self, command: u8, scope: CrcScope) -> Result<u16, FrameError> {
        let [lo, hi, received] = self.bytes;
        let expected = scope.response_crc(command, lo, hi);
        if expected != received {
            return Err(FrameError::ChecksumMismatch { expected, received });
        }

        Ok(self.value())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bus_addresses() {
        assert_eq!(WRITE_ADDR, 0x16);
        assert_eq!(READ_ADDR, 0x17);
    }

    #[test]
    fn word_round_trip() {
        for lo in 0..=u8::MAX {
            for hi in 0..=u8::MAX {
                let value = decode_word(lo, hi);
                assert_eq!(value, (hi as u16) << 8 | lo as u16);
                assert_eq!(encode_word(value), (lo, hi));
            }
        }
    }

    #[test]
    fn command_frames() {
        #[rustfmt::skip]
        let table = [
            (0x04, 0xAA55, CrcScope::Frame, [0x04, 0x55, 0xAA, 0xB9]),
            (0x06, 0x0D34, CrcScope::Frame, [0x06, 0x34, 0x0D, 0xF3]),
            (0x13, 0x0008, CrcScope::Frame, [0x13, 0x08, 0x00, 0xB7]),
            (0x15, 0x0001, CrcScope::Smbus, [0x15, 0x01, 0x00, 0x64]),
        ];

        for (command, value, scope, expected) in table {
            let frame = CommandFrame::new(command, value, scope);
            assert_eq!(frame.as_bytes(), expected);
            assert_eq!(frame.command(), command);
            assert_eq!(frame.value(), value);
            assert_eq!(frame.checksum(), expected[3]);
        }
    }

    #[test]
    fn command_frame_parse() {
        let frame = CommandFrame::parse(&[0x0C, 0x1E, 0x00, 0x7B], CrcScope::Frame).unwrap();
        assert_eq!(frame.command(), 0x0C);
        assert_eq!(frame.value(), 30);

        assert_eq!(
            CommandFrame::parse(&[0x0C, 0x1E, 0x00, 0x00], CrcScope::Frame),
            Err(FrameError::ChecksumMismatch {
                expected: 0x7B,
                received: 0x00
            })
        );
        assert_eq!(
            CommandFrame::parse(&[0x0C, 0x1E, 0x00], CrcScope::Frame),
            Err(FrameError::InvalidLength {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn response_frames() {
        #[rustfmt::skip]
        let table = [
            (0x0D, 100, CrcScope::Frame, [0x64, 0x00, 0xA1]),
            (0x09, 3700, CrcScope::Frame, [0x74, 0x0E, 0xDC]),
            (0x08, 2515, CrcScope::Frame, [0xD3, 0x09, 0xBA]),
            (0x0D, 100, CrcScope::Smbus, [0x64, 0x00, 0x92]),
            (0x09, 3700, CrcScope::Smbus, [0x74, 0x0E, 0xB7]),
        ];

        for (command, value, scope, expected) in table {
            let frame = ResponseFrame::new(command, value, scope);
            assert_eq!(frame.as_bytes(), expected);
            assert_eq!(frame.verify(command, scope), Ok(value));
        }
    }

    #[test]
    fn response_checksum_mismatch() {
        let frame = ResponseFrame::from_bytes([0x64, 0x00, 0xA0]);
        assert_eq!(frame.value(), 100);
        assert_eq!(
            frame.verify(0x0D, CrcScope::Frame),
            Err(FrameError::ChecksumMismatch {
                expected: 0xA1,
                received: 0xA0
            })
        );
    }

    #[test]
    fn response_parse_checks_length() {
        assert!(ResponseFrame::parse(&[0x64, 0x00, 0xA1]).is_ok());
        assert_eq!(
            ResponseFrame::parse(&[0x64, 0x00]),
            Err(FrameError::InvalidLength {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            ResponseFrame::parse(&[0x64, 0x00, 0xA1, 0x00]),
            Err(FrameError::InvalidLength {
                expected: 3,
                actual: 4
            })
        );
    }
}
