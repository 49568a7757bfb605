/*!
Common error types for EDID decoding.

Every variant except [`EdidError::Io`] and [`EdidError::InvalidHex`] is
recoverable during aggregation: the refresh pass logs it and falls back to a
less complete result.
*/

use thiserror::Error;

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, EdidError>;

/// Error type for all decoding operations
#[derive(Error, Debug)]
pub enum EdidError {
    /// Bytes 0-7 are not the fixed EDID header pattern
    #[error("EDID header pattern mismatch: {found:02X?}")]
    MagicMismatch { found: [u8; 8] },

    /// Base block declares no extension blocks
    #[error("base block declares no extension blocks")]
    NoExtension,

    /// None of the candidate slots carries the CTA tag
    #[error("no CTA extension found in any of the {slots} extension slots")]
    ExtensionNotFound { slots: usize },

    /// Data block walk reached `dtd_start` without a video data block
    #[error("no video data block before offset {dtd_start:#04x}")]
    NoVideoDataBlock { dtd_start: u8 },

    /// Short video descriptor index is zero after the raw-byte fallback
    #[error("invalid VIC index {index} in short video descriptor {raw:#04x}")]
    InvalidVicIndex { index: u8, raw: u8 },

    /// VIC has no entry in the timing table
    #[error("VIC {0} is not in the timing table")]
    UnknownVic(u8),

    /// Descriptor is padding (width or height <= 1)
    #[error("degenerate descriptor {width}x{height}")]
    DegenerateDescriptor { width: u32, height: u32 },

    /// Descriptor has a zero pixel clock and describes no timing
    #[error("descriptor has a zero pixel clock")]
    InactiveDescriptor,

    /// Read outside the fixed record bounds
    #[error("read of {len} byte(s) at offset {offset:#05x} exceeds the {bound}-byte record")]
    OutOfBounds { offset: usize, len: usize, bound: usize },

    /// Text input is not a valid hex dump
    #[error("invalid hex dump: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EdidError {
    /// Check if this error ends the pass with the default refresh rate
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::MagicMismatch { .. } | Self::NoExtension | Self::ExtensionNotFound { .. }
        )
    }
}
