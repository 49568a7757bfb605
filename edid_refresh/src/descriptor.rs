/*!
Detailed timing descriptor decoding.

An 18-byte descriptor packs 12-bit quantities as an LSB byte plus a nibble
shared with a second field. Byte layout:

| Byte  | Bits | Field                                              |
|-------|------|----------------------------------------------------|
| 0-1   |      | pixel clock, 10 kHz units, little-endian           |
| 2     |      | horizontal active LSB                              |
| 3     |      | horizontal blanking LSB                            |
| 4     | 7:4  | horizontal active MSB                              |
| 4     | 3:0  | horizontal blanking MSB                            |
| 5     |      | vertical active LSB                                |
| 6     |      | vertical blanking LSB                              |
| 7     | 7:4  | vertical active MSB                                |
| 7     | 3:0  | vertical blanking MSB                              |
| 8     |      | horizontal sync offset LSB                         |
| 9     |      | horizontal sync width LSB                          |
| 10    | 7:4  | vertical sync offset LSB                           |
| 10    | 3:0  | vertical sync width LSB                            |
| 11    | 7:6  | horizontal sync offset MSB                         |
| 11    | 5:4  | horizontal sync width MSB                          |
| 11    | 3:2  | vertical sync offset MSB                           |
| 11    | 1:0  | vertical sync width MSB                            |
| 12    |      | horizontal image size (mm) LSB                     |
| 13    |      | vertical image size (mm) LSB                       |
| 14    | 7:4  | horizontal image size MSB                          |
| 14    | 3:0  | vertical image size MSB                            |
| 15    |      | horizontal border                                  |
| 16    |      | vertical border                                    |
| 17    | 7    | interlaced                                         |
*/

use crate::error::{EdidError, Result};
use crate::layout::DTD_SIZE;
use crate::record::EdidRecord;

/// A decoded detailed timing descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetailedTiming {
    /// Pixel clock in 10 kHz units; zero marks a non-timing descriptor
    pub pixel_clock: u16,
    pub h_active: u16,
    pub h_blanking: u16,
    pub v_active: u16,
    pub v_blanking: u16,
    pub h_sync_offset: u16,
    pub h_sync_width: u16,
    pub v_sync_offset: u8,
    pub v_sync_width: u8,
    pub h_image_mm: u16,
    pub v_image_mm: u16,
    pub h_border: u8,
    pub v_border: u8,
    /// Raw byte 17 (sync type, stereo mode, interlace)
    pub features: u8,
    pub interlaced: bool,
}

/// Combine an LSB byte with the high bits stored elsewhere
fn split_field(lsb: u8, msb: u8) -> u16 {
    (u16::from(msb) << 8) | u16::from(lsb)
}

fn high_nibble(byte: u8) -> u8 {
    byte >> 4
}

fn low_nibble(byte: u8) -> u8 {
    byte & 0x0F
}

impl DetailedTiming {
    /// Decode a descriptor from its 18 raw bytes
    pub fn from_bytes(b: &[u8; DTD_SIZE]) -> Self {
        Self {
            pixel_clock: u16::from_le_bytes([b[0], b[1]]),
            h_active: split_field(b[2], high_nibble(b[4])),
            h_blanking: split_field(b[3], low_nibble(b[4])),
            v_active: split_field(b[5], high_nibble(b[7])),
            v_blanking: split_field(b[6], low_nibble(b[7])),
            h_sync_offset: split_field(b[8], b[11] >> 6),
            h_sync_width: split_field(b[9], (b[11] >> 4) & 0b11),
            v_sync_offset: high_nibble(b[10]) | (((b[11] >> 2) & 0b11) << 4),
            v_sync_width: low_nibble(b[10]) | ((b[11] & 0b11) << 4),
            h_image_mm: split_field(b[12], high_nibble(b[14])),
            v_image_mm: split_field(b[13], low_nibble(b[14])),
            h_border: b[15],
            v_border: b[16],
            features: b[17],
            interlaced: b[17] & 0x80 != 0,
        }
    }

    /// Decode the descriptor at an absolute record offset
    pub fn read(record: &EdidRecord, offset: usize) -> Result<Self> {
        record.read_array::<DTD_SIZE>(offset).map(Self::from_bytes)
    }

    /// Check if this descriptor describes a timing at all
    pub fn is_active(&self) -> bool {
        self.pixel_clock != 0
    }

    /// Check if the active area is padding (width or height <= 1)
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 1 || self.height() <= 1
    }

    pub fn width(&self) -> u32 {
        u32::from(self.h_active)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.v_active)
    }

    pub fn h_total(&self) -> u32 {
        u32::from(self.h_active) + u32::from(self.h_blanking)
    }

    pub fn v_total(&self) -> u32 {
        u32::from(self.v_active) + u32::from(self.v_blanking)
    }

    pub fn pixel_clock_khz(&self) -> u32 {
        u32::from(self.pixel_clock) * 10
    }

    pub fn h_back_porch(&self) -> u16 {
        self.h_blanking
            .saturating_sub(self.h_sync_offset + self.h_sync_width)
    }

    pub fn v_back_porch(&self) -> u16 {
        self.v_blanking
            .saturating_sub(u16::from(self.v_sync_offset) + u16::from(self.v_sync_width))
    }

    /// Refresh rate in Hz, or `None` when the descriptor carries no timing
    pub fn refresh_hz(&self) -> Option<f64> {
        let total = u64::from(self.h_total()) * u64::from(self.v_total());
        if !self.is_active() || total == 0 {
            return None;
        }
        Some(f64::from(self.pixel_clock) * 10_000.0 / total as f64)
    }

    /// Refresh rate of a descriptor eligible for aggregation.
    ///
    /// Rejects padding entries and zero pixel clocks.
    pub fn usable_refresh_hz(&self) -> Result<f64> {
        if self.is_degenerate() {
            return Err(EdidError::DegenerateDescriptor {
                width: self.width(),
                height: self.height(),
            });
        }
        self.refresh_hz().ok_or(EdidError::InactiveDescriptor)
    }
}
