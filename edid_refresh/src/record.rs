/*!
Fixed-size EDID record and bounds-checked field accessors.

All offsets are absolute within the 512-byte image. Multi-byte fields are
little-endian unless the accessor name says otherwise.
*/

use crate::error::{EdidError, Result};
use crate::layout::RECORD_SIZE;
use std::path::Path;

/// A 512-byte EDID image: base block followed by three extension slots
#[derive(Clone, PartialEq, Eq)]
pub struct EdidRecord {
    data: [u8; RECORD_SIZE],
}

impl EdidRecord {
    /// Build a record from raw bytes.
    ///
    /// Shorter input is zero-padded, anything past 512 bytes is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut data = [0u8; RECORD_SIZE];
        let len = bytes.len().min(RECORD_SIZE);
        data[..len].copy_from_slice(&bytes[..len]);
        Self { data }
    }

    /// Load a record from a binary EDID dump
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Parse a textual hex dump such as the output of `xrandr --verbose`.
    ///
    /// Whitespace and `0x` prefixes are ignored.
    pub fn from_hex_str(text: &str) -> Result<Self> {
        let digits: String = text
            .split_whitespace()
            .map(|token| token.trim_start_matches("0x").trim_start_matches("0X"))
            .collect();
        let bytes = hex::decode(digits)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Check whether raw file content looks like a hex dump rather than binary
    pub fn looks_like_hex(content: &[u8]) -> bool {
        let mut saw_digit = false;
        for &byte in content {
            if byte.is_ascii_hexdigit() {
                saw_digit = true;
            } else if !(byte.is_ascii_whitespace() || byte == b'x' || byte == b'X') {
                return false;
            }
        }
        saw_digit
    }

    /// Get the full image
    pub fn as_bytes(&self) -> &[u8; RECORD_SIZE] {
        &self.data
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .filter(|&end| end <= RECORD_SIZE)
            .map(|end| &self.data[offset..end])
            .ok_or(EdidError::OutOfBounds { offset, len, bound: RECORD_SIZE })
    }

    /// Borrow a fixed-size array starting at `offset`
    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<&[u8; N]> {
        self.slice(offset, N)?.try_into().map_err(|_| EdidError::OutOfBounds {
            offset,
            len: N,
            bound: RECORD_SIZE,
        })
    }

    pub fn read_u8_at(&self, offset: usize) -> Result<u8> {
        self.slice(offset, 1).map(|b| b[0])
    }

    pub fn read_u16_le_at(&self, offset: usize) -> Result<u16> {
        self.read_array::<2>(offset).map(|b| u16::from_le_bytes(*b))
    }

    pub fn read_u16_be_at(&self, offset: usize) -> Result<u16> {
        self.read_array::<2>(offset).map(|b| u16::from_be_bytes(*b))
    }

    pub fn read_u32_le_at(&self, offset: usize) -> Result<u32> {
        self.read_array::<4>(offset).map(|b| u32::from_le_bytes(*b))
    }

    /// Read `width` bits starting at bit `shift` (0 = LSB) of the byte at `offset`
    pub fn read_bitfield(&self, offset: usize, shift: u32, width: u32) -> Result<u8> {
        debug_assert!(shift + width <= 8, "bitfield must fit in one byte");
        let byte = self.read_u8_at(offset)?;
        Ok((byte >> shift) & (((1u16 << width) - 1) as u8))
    }
}

impl Default for EdidRecord {
    fn default() -> Self {
        Self { data: [0u8; RECORD_SIZE] }
    }
}

impl std::fmt::Debug for EdidRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdidRecord")
            .field("header", &hex::encode(&self.data[..8]))
            .field("len", &RECORD_SIZE)
            .finish()
    }
}
