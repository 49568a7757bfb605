/*!
EDID base block validation and identity decoding.

Only the header pattern gates the refresh pass. Identity fields, standard
timings and the two base descriptors are decoded for diagnostics.
*/

use crate::descriptor::DetailedTiming;
use crate::error::{EdidError, Result};
use crate::layout::*;
use crate::record::EdidRecord;
use serde::Serialize;

/// Check bytes 0-7 against the fixed header pattern
pub fn validate_magic(record: &EdidRecord) -> Result<()> {
    let found = *record.read_array::<8>(0)?;
    if found != MAGIC {
        return Err(EdidError::MagicMismatch { found });
    }
    Ok(())
}

/// Aspect ratio of a standard timing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AspectRatio {
    #[serde(rename = "16:10")]
    A16_10,
    #[serde(rename = "4:3")]
    A4_3,
    #[serde(rename = "5:4")]
    A5_4,
    #[serde(rename = "16:9")]
    A16_9,
}

impl AspectRatio {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::A16_10,
            0b01 => Self::A4_3,
            0b10 => Self::A5_4,
            _ => Self::A16_9,
        }
    }

    /// Vertical resolution for a given horizontal resolution
    pub fn height_for(self, width: u16) -> u16 {
        let w = u32::from(width);
        let h = match self {
            Self::A16_10 => w * 10 / 16,
            Self::A4_3 => w * 3 / 4,
            Self::A5_4 => w * 4 / 5,
            Self::A16_9 => w * 9 / 16,
        };
        h as u16
    }
}

/// One of the eight 2-byte standard timing entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StandardTiming {
    pub width: u16,
    pub height: u16,
    pub refresh_hz: u8,
    pub aspect_ratio: AspectRatio,
}

impl StandardTiming {
    /// Decode an entry; `None` for the unused `01 01` marker or a zero first byte
    pub fn decode(a: u8, b: u8) -> Option<Self> {
        if a == 0 || (a == 0x01 && b == 0x01) {
            return None;
        }
        let width = (u16::from(a) + 31) * 8;
        let aspect_ratio = AspectRatio::from_bits(b >> 6);
        Some(Self {
            width,
            height: aspect_ratio.height_for(width),
            refresh_hz: 60 + (b & 0x3F),
            aspect_ratio,
        })
    }
}

/// Identity and diagnostic content of the 128-byte base block
#[derive(Debug, Clone, Serialize)]
pub struct BaseBlock {
    pub manufacturer: String,
    pub product_code: u16,
    pub serial_number: u32,
    pub manufacture_week: u8,
    pub manufacture_year: u16,
    pub version: u8,
    pub revision: u8,
    pub extension_count: u8,
    pub standard_timings: Vec<StandardTiming>,
    #[serde(skip)]
    pub detailed_timings: [DetailedTiming; BASE_DTD_COUNT],
}

impl BaseBlock {
    /// Decode the base block of a record whose header is valid
    pub fn decode(record: &EdidRecord) -> Result<Self> {
        validate_magic(record)?;

        let mut standard_timings = Vec::with_capacity(STANDARD_TIMING_COUNT);
        for i in 0..STANDARD_TIMING_COUNT {
            let [a, b] = *record.read_array::<2>(STANDARD_TIMINGS_OFFSET + i * 2)?;
            standard_timings.extend(StandardTiming::decode(a, b));
        }

        let mut detailed_timings = [DetailedTiming::default(); BASE_DTD_COUNT];
        for (i, slot) in detailed_timings.iter_mut().enumerate() {
            *slot = DetailedTiming::read(record, BASE_DTD_OFFSET + i * DTD_SIZE)?;
        }

        Ok(Self {
            manufacturer: decode_pnp_id(record.read_u16_be_at(MANUFACTURER_ID_OFFSET)?),
            product_code: record.read_u16_le_at(PRODUCT_CODE_OFFSET)?,
            serial_number: record.read_u32_le_at(SERIAL_NUMBER_OFFSET)?,
            manufacture_week: record.read_u8_at(MANUFACTURE_WEEK_OFFSET)?,
            manufacture_year: 1990 + u16::from(record.read_u8_at(MANUFACTURE_YEAR_OFFSET)?),
            version: record.read_u8_at(VERSION_OFFSET)?,
            revision: record.read_u8_at(REVISION_OFFSET)?,
            extension_count: record.read_u8_at(EXTENSION_COUNT_OFFSET)?,
            standard_timings,
            detailed_timings,
        })
    }
}

/// Three 5-bit letters, 1 = 'A'. Out-of-range codes render as '?'.
fn decode_pnp_id(id: u16) -> String {
    [10u16, 5, 0]
        .iter()
        .map(|shift| match ((id >> shift) & 0x1F) as u8 {
            code @ 1..=26 => char::from(b'@' + code),
            _ => '?',
        })
        .collect()
}
