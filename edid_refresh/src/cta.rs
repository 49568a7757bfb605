/*!
CTA-861 extension location and data block walking.

The extension is addressed through a view offset into the record rather than
by copying a spare slot over the primary one, so the record stays untouched
for later reads.
*/

use crate::descriptor::DetailedTiming;
use crate::error::{EdidError, Result};
use crate::layout::*;
use crate::record::EdidRecord;
use serde::Serialize;

/// Which of the fixed extension slots holds the CTA block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionSlot {
    Primary,
    Spare2,
    Spare3,
}

impl ExtensionSlot {
    /// Slots in search order
    pub const ALL: [ExtensionSlot; 3] = [Self::Primary, Self::Spare2, Self::Spare3];

    /// Absolute offset of the slot within the record
    pub fn offset(self) -> usize {
        match self {
            Self::Primary => EXTENSION_SLOT_OFFSETS[0],
            Self::Spare2 => EXTENSION_SLOT_OFFSETS[1],
            Self::Spare3 => EXTENSION_SLOT_OFFSETS[2],
        }
    }
}

/// Data block type from the top 3 bits of the block header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataBlockKind {
    Audio,
    Video,
    VendorSpecific,
    Speaker,
    Other(u8),
}

impl DataBlockKind {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            1 => Self::Audio,
            2 => Self::Video,
            3 => Self::VendorSpecific,
            4 => Self::Speaker,
            other => Self::Other(other),
        }
    }
}

/// Header of one data block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataBlockHeader {
    pub kind: DataBlockKind,
    /// Payload length in bytes, excluding the header byte
    pub size: u8,
    /// Offset of the header byte from the start of the extension
    pub offset: usize,
}

impl DataBlockHeader {
    fn from_byte(byte: u8, offset: usize) -> Self {
        Self {
            kind: DataBlockKind::from_bits(byte >> 5),
            size: byte & 0x1F,
            offset,
        }
    }
}

/// Feature flags from the high nibble of extension byte 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CtaFlags {
    pub underscan: bool,
    pub basic_audio: bool,
    pub ycbcr_444: bool,
    pub ycbcr_422: bool,
}

/// One byte of a video data block: 7-bit VIC plus native flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortVideoDescriptor {
    raw: u8,
}

impl ShortVideoDescriptor {
    pub fn new(raw: u8) -> Self {
        Self { raw }
    }

    pub fn raw(self) -> u8 {
        self.raw
    }

    /// Low 7 bits
    pub fn index(self) -> u8 {
        self.raw & 0x7F
    }

    /// VIC addressed by this descriptor.
    ///
    /// Indices above 64 are taken from the whole byte, since some encoders
    /// do not use the native flag. Zero is invalid.
    pub fn vic(self) -> Result<u8> {
        let index = match self.index() {
            index if index > MAX_SVD_VIC => self.raw,
            index => index,
        };
        if index == 0 {
            return Err(EdidError::InvalidVicIndex { index, raw: self.raw });
        }
        Ok(index)
    }

    pub fn is_native(self) -> bool {
        self.raw & 0x80 != 0 && self.index() <= MAX_SVD_VIC
    }
}

/// A located CTA extension
#[derive(Debug, Clone, Copy)]
pub struct CtaExtension<'a> {
    record: &'a EdidRecord,
    slot: ExtensionSlot,
}

impl<'a> CtaExtension<'a> {
    /// Find the CTA extension among the fixed slots.
    ///
    /// Fails with [`EdidError::NoExtension`] when the base block declares
    /// none and [`EdidError::ExtensionNotFound`] when no slot has the CTA tag.
    pub fn locate(record: &'a EdidRecord) -> Result<Self> {
        if record.read_u8_at(EXTENSION_COUNT_OFFSET)? == 0 {
            return Err(EdidError::NoExtension);
        }
        for slot in ExtensionSlot::ALL {
            if record.read_u8_at(slot.offset())? == CTA_EXTENSION_TAG {
                return Ok(Self { record, slot });
            }
        }
        Err(EdidError::ExtensionNotFound { slots: ExtensionSlot::ALL.len() })
    }

    pub fn slot(&self) -> ExtensionSlot {
        self.slot
    }

    fn read_u8(&self, offset: usize) -> Result<u8> {
        self.record.read_u8_at(self.slot.offset() + offset)
    }

    pub fn revision(&self) -> Result<u8> {
        self.read_u8(1)
    }

    /// Offset from the extension start where detailed timings begin; 0 means
    /// the extension carries neither data blocks nor descriptors
    pub fn dtd_start(&self) -> Result<u8> {
        self.read_u8(2)
    }

    pub fn native_dtd_count(&self) -> Result<u8> {
        self.record.read_bitfield(self.slot.offset() + 3, 0, 4)
    }

    pub fn flags(&self) -> Result<CtaFlags> {
        let bits = self.record.read_bitfield(self.slot.offset() + 3, 4, 4)?;
        Ok(CtaFlags {
            underscan: bits & 0b1000 != 0,
            basic_audio: bits & 0b0100 != 0,
            ycbcr_444: bits & 0b0010 != 0,
            ycbcr_422: bits & 0b0001 != 0,
        })
    }

    /// Walk the data block collection between the header and `dtd_start`
    pub fn data_blocks(&self) -> Result<DataBlocks<'a>> {
        Ok(DataBlocks {
            record: self.record,
            base: self.slot.offset(),
            offset: CTA_HEADER_LEN,
            end: usize::from(self.dtd_start()?),
            failed: false,
        })
    }

    /// First video data block, skipping other block types by their size
    pub fn video_data_block(&self) -> Result<VideoDataBlock<'a>> {
        for header in self.data_blocks()? {
            let header = header?;
            if header.kind == DataBlockKind::Video {
                return Ok(VideoDataBlock {
                    record: self.record,
                    payload: self.slot.offset() + header.offset + 1,
                    size: header.size,
                });
            }
        }
        Err(EdidError::NoVideoDataBlock { dtd_start: self.dtd_start()? })
    }

    /// The detailed timing descriptors at `dtd_start`, paired with their index
    pub fn detailed_timings(
        &self,
    ) -> Result<impl Iterator<Item = (usize, Result<DetailedTiming>)> + 'a> {
        let record = self.record;
        let start = self.slot.offset() + usize::from(self.dtd_start()?);
        Ok((0..EXTENSION_DTD_COUNT)
            .map(move |i| (i, DetailedTiming::read(record, start + i * DTD_SIZE))))
    }
}

/// Iterator over data block headers
pub struct DataBlocks<'a> {
    record: &'a EdidRecord,
    base: usize,
    offset: usize,
    end: usize,
    failed: bool,
}

impl Iterator for DataBlocks<'_> {
    type Item = Result<DataBlockHeader>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.end {
            return None;
        }
        match self.record.read_u8_at(self.base + self.offset) {
            Ok(byte) => {
                let header = DataBlockHeader::from_byte(byte, self.offset);
                self.offset += 1 + usize::from(header.size);
                Some(Ok(header))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Payload of a video data block
#[derive(Debug, Clone, Copy)]
pub struct VideoDataBlock<'a> {
    record: &'a EdidRecord,
    payload: usize,
    size: u8,
}

impl<'a> VideoDataBlock<'a> {
    /// Number of short video descriptors
    pub fn len(&self) -> usize {
        usize::from(self.size)
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Short video descriptors in block order
    pub fn svds(&self) -> impl Iterator<Item = Result<ShortVideoDescriptor>> + 'a {
        let record = self.record;
        let payload = self.payload;
        (0..self.len()).map(move |i| record.read_u8_at(payload + i).map(ShortVideoDescriptor::new))
    }
}
