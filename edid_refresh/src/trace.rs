/*!
Decode tracing.

Every decode pass takes a [`DecodeObserver`]; callers choose whether the
steps are discarded, forwarded to `tracing`, or collected.
*/

use crate::cta::ExtensionSlot;
use crate::error::EdidError;
use crate::refresh::{TimingReport, TimingSource};
use tracing::{debug, info, warn};

/// One step of a decode pass
#[derive(Debug, Clone, Copy)]
pub enum DecodeEvent<'a> {
    /// The pass ended early with the default refresh rate
    Rejected(&'a EdidError),
    ExtensionLocated {
        slot: ExtensionSlot,
        revision: u8,
        dtd_start: u8,
        native_dtd_count: u8,
    },
    VideoDataBlock { svd_count: usize },
    /// A non-fatal problem outside any single timing
    Recovered(&'a EdidError),
    /// A decoded candidate timing
    Timing(&'a TimingReport),
    /// A timing source that yielded nothing
    Skipped {
        source: TimingSource,
        error: &'a EdidError,
    },
    Finished { highest_hz: f64 },
}

/// Receiver for decode steps
pub trait DecodeObserver {
    fn observe(&mut self, event: DecodeEvent<'_>);
}

/// Discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl DecodeObserver for NullObserver {
    fn observe(&mut self, _event: DecodeEvent<'_>) {}
}

/// Forwards events to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DecodeObserver for TracingObserver {
    fn observe(&mut self, event: DecodeEvent<'_>) {
        match event {
            DecodeEvent::Rejected(error) if error.is_terminal() => {
                info!("Using default refresh rate: {}", error);
            }
            DecodeEvent::Rejected(error) => {
                warn!("Decode failed, using default refresh rate: {}", error);
            }
            DecodeEvent::ExtensionLocated { slot, revision, dtd_start, native_dtd_count } => {
                debug!(
                    ?slot,
                    revision,
                    dtd_start,
                    native_dtd_count,
                    "CTA extension located"
                );
            }
            DecodeEvent::VideoDataBlock { svd_count } => {
                debug!("Video data block with {} short video descriptors", svd_count);
            }
            DecodeEvent::Recovered(error) => {
                debug!("{}", error);
            }
            DecodeEvent::Timing(timing) => {
                debug!("{}: {}", timing.source, timing);
            }
            DecodeEvent::Skipped { source, error } => match error {
                EdidError::InvalidVicIndex { .. }
                | EdidError::UnknownVic(_)
                | EdidError::OutOfBounds { .. } => {
                    warn!("Skipping {}: {}", source, error);
                }
                _ => debug!("Skipping {}: {}", source, error),
            },
            DecodeEvent::Finished { highest_hz } => {
                info!("Highest progressive refresh rate: {:.4} Hz", highest_hz);
            }
        }
    }
}
