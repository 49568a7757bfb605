//! Synthetic EDID images for unit tests.

use crate::layout::{
    BASE_DTD_OFFSET, BLOCK_SIZE, CTA_EXTENSION_TAG, CTA_HEADER_LEN, DTD_SIZE,
    EXTENSION_COUNT_OFFSET, EXTENSION_SLOT_OFFSETS, MAGIC, RECORD_SIZE,
};
use crate::record::EdidRecord;

/// Encode a descriptor with the given active area, blanking and pixel clock
pub(crate) fn dtd_bytes(
    pixel_clock: u16,
    width: u16,
    height: u16,
    h_blank: u16,
    v_blank: u16,
    interlaced: bool,
) -> [u8; DTD_SIZE] {
    let mut b = [0u8; DTD_SIZE];
    b[0..2].copy_from_slice(&pixel_clock.to_le_bytes());
    b[2] = (width & 0xFF) as u8;
    b[3] = (h_blank & 0xFF) as u8;
    b[4] = (((width >> 8) as u8) << 4) | ((h_blank >> 8) as u8 & 0x0F);
    b[5] = (height & 0xFF) as u8;
    b[6] = (v_blank & 0xFF) as u8;
    b[7] = (((height >> 8) as u8) << 4) | ((v_blank >> 8) as u8 & 0x0F);
    b[17] = if interlaced { 0x9E } else { 0x1E };
    b
}

/// Contents of one CTA extension slot
#[derive(Default)]
pub(crate) struct CtaBlock {
    blocks: Vec<u8>,
    dtds: Vec<[u8; DTD_SIZE]>,
    dtd_start: Option<u8>,
    tag: Option<u8>,
    flags: u8,
}

impl CtaBlock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn data_block(mut self, kind: u8, payload: &[u8]) -> Self {
        assert!(payload.len() < 32, "data block payload is limited to 31 bytes");
        self.blocks.push((kind << 5) | payload.len() as u8);
        self.blocks.extend_from_slice(payload);
        self
    }

    pub(crate) fn video(self, svds: &[u8]) -> Self {
        self.data_block(2, svds)
    }

    pub(crate) fn dtd(mut self, bytes: [u8; DTD_SIZE]) -> Self {
        self.dtds.push(bytes);
        self
    }

    pub(crate) fn dtd_start(mut self, dtd_start: u8) -> Self {
        self.dtd_start = Some(dtd_start);
        self
    }

    pub(crate) fn tag(mut self, tag: u8) -> Self {
        self.tag = Some(tag);
        self
    }

    pub(crate) fn flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    pub(crate) fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut slot = [0u8; BLOCK_SIZE];
        let start = CTA_HEADER_LEN + self.blocks.len();
        slot[0] = self.tag.unwrap_or(CTA_EXTENSION_TAG);
        slot[1] = 3;
        slot[2] = self.dtd_start.unwrap_or(start as u8);
        slot[3] = self.flags;
        slot[CTA_HEADER_LEN..start].copy_from_slice(&self.blocks);
        for (i, dtd) in self.dtds.iter().enumerate() {
            let at = start + i * DTD_SIZE;
            slot[at..at + DTD_SIZE].copy_from_slice(dtd);
        }
        slot
    }
}

/// Builder for a full 512-byte image with a valid header
pub(crate) struct RecordBuilder {
    data: [u8; RECORD_SIZE],
}

impl RecordBuilder {
    pub(crate) fn new() -> Self {
        let mut data = [0u8; RECORD_SIZE];
        data[..8].copy_from_slice(&MAGIC);
        data[0x12] = 1;
        data[0x13] = 3;
        Self { data }
    }

    pub(crate) fn set(mut self, offset: usize, value: u8) -> Self {
        self.data[offset] = value;
        self
    }

    pub(crate) fn extension_count(self, count: u8) -> Self {
        self.set(EXTENSION_COUNT_OFFSET, count)
    }

    pub(crate) fn base_dtd(mut self, index: usize, bytes: [u8; DTD_SIZE]) -> Self {
        let at = BASE_DTD_OFFSET + index * DTD_SIZE;
        self.data[at..at + DTD_SIZE].copy_from_slice(&bytes);
        self
    }

    /// Place a CTA block in slot 0 (primary), 1 or 2 and declare one extension
    pub(crate) fn cta(mut self, slot: usize, block: &CtaBlock) -> Self {
        let at = EXTENSION_SLOT_OFFSETS[slot];
        self.data[at..at + BLOCK_SIZE].copy_from_slice(&block.to_bytes());
        if self.data[EXTENSION_COUNT_OFFSET] == 0 {
            self.data[EXTENSION_COUNT_OFFSET] = 1;
        }
        self
    }

    pub(crate) fn build(self) -> EdidRecord {
        EdidRecord::from_bytes(&self.data)
    }
}
