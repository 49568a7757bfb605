/*!
# EDID Refresh Rate Decoding

This crate decodes a fixed 512-byte EDID image (base block plus CTA-861
timing extension) and reports the highest progressive refresh rate the
display advertises, without relying on an OS-provided EDID parser.

## Core Types

- [`EdidRecord`] - 512-byte EDID image with bounds-checked accessors
- [`DetailedTiming`] - Decoded 18-byte detailed timing descriptor
- [`CtaExtension`] - View over the located CTA-861 extension block
- [`CanonicalTiming`] - Standard timing parameters for one VIC
- [`RefreshReport`] - Full result of one aggregation pass

## Modules

- [`record`] - Record construction and field accessors
- [`base`] - Base block validation and identity
- [`descriptor`] - Detailed timing descriptor decoding
- [`cta`] - CTA extension location and data block walking
- [`vic`] - VIC timing table and resolution
- [`refresh`] - Refresh rate aggregation
- [`trace`] - Injected decode tracing
- [`error`] - Common error types
*/

pub mod base;
pub mod cta;
pub mod descriptor;
pub mod error;
pub mod record;
pub mod refresh;
pub mod trace;
pub mod vic;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used types
pub use base::{BaseBlock, StandardTiming};
pub use cta::{CtaExtension, DataBlockKind, ExtensionSlot, ShortVideoDescriptor};
pub use descriptor::DetailedTiming;
pub use error::{EdidError, Result};
pub use record::EdidRecord;
pub use refresh::{
    analyze, highest_refresh_rate, RefreshOutcome, RefreshReport, TimingReport, TimingSource,
};
pub use trace::{DecodeEvent, DecodeObserver, NullObserver, TracingObserver};
pub use vic::{CanonicalTiming, CtaVicTable, VicTable};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Refresh rate reported when nothing better can be decoded
pub const DEFAULT_REFRESH_HZ: f64 = 60.0;

/// Fixed record layout constants
pub mod layout {
    /// Size of the full EDID image in bytes (base block + three extension slots)
    pub const RECORD_SIZE: usize = 0x200;

    /// Size of one EDID block in bytes
    pub const BLOCK_SIZE: usize = 0x80;

    /// Fixed header pattern at offset 0
    pub const MAGIC: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

    /// Big-endian PNP manufacturer id
    pub const MANUFACTURER_ID_OFFSET: usize = 0x08;
    pub const PRODUCT_CODE_OFFSET: usize = 0x0A;
    pub const SERIAL_NUMBER_OFFSET: usize = 0x0C;
    pub const MANUFACTURE_WEEK_OFFSET: usize = 0x10;
    pub const MANUFACTURE_YEAR_OFFSET: usize = 0x11;
    pub const VERSION_OFFSET: usize = 0x12;
    pub const REVISION_OFFSET: usize = 0x13;

    /// Eight 2-byte standard timing entries
    pub const STANDARD_TIMINGS_OFFSET: usize = 0x26;
    pub const STANDARD_TIMING_COUNT: usize = 8;

    /// The two detailed timing descriptors of the base block
    pub const BASE_DTD_OFFSET: usize = 0x36;
    pub const BASE_DTD_COUNT: usize = 2;

    pub const EXTENSION_COUNT_OFFSET: usize = 0x7E;

    /// Candidate extension slots, searched in order
    pub const EXTENSION_SLOT_OFFSETS: [usize; 3] = [0x80, 0x100, 0x180];

    /// Tag byte identifying a CTA-861 timing extension
    pub const CTA_EXTENSION_TAG: u8 = 0x02;

    /// Tag, revision, dtd_start and flags/native count
    pub const CTA_HEADER_LEN: usize = 4;

    /// Detailed timing descriptors scanned at `dtd_start`
    pub const EXTENSION_DTD_COUNT: usize = 5;

    /// Size of a detailed timing descriptor in bytes
    pub const DTD_SIZE: usize = 18;

    /// Highest VIC addressed through the 7-bit SVD index
    pub const MAX_SVD_VIC: u8 = 64;
}
