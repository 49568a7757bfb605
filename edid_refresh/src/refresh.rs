/*!
Refresh rate aggregation.

A pass validates the base block, locates the CTA extension, resolves every
short video descriptor and decodes the extension's detailed timings, folding
each progressive rate into a running maximum that starts at 60 Hz.

The two base block descriptors are decoded and reported but never raise the
maximum.
*/

use crate::base::{validate_magic, BaseBlock};
use crate::cta::{CtaExtension, CtaFlags, DataBlockHeader, ExtensionSlot};
use crate::descriptor::DetailedTiming;
use crate::error::{EdidError, Result};
use crate::record::EdidRecord;
use crate::trace::{DecodeEvent, DecodeObserver};
use crate::vic::{self, ResolvedVic, VicTable};
use crate::DEFAULT_REFRESH_HZ;
use serde::Serialize;
use std::fmt;

/// Where a candidate timing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimingSource {
    /// One of the two base block descriptors
    Base { index: usize },
    /// A short video descriptor, by position in the video data block
    Svd { index: usize, raw: u8 },
    /// One of the five extension descriptors
    Extension { index: usize },
}

impl fmt::Display for TimingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base { index } => write!(f, "base DTD {}", index),
            Self::Svd { index, raw } => write!(f, "SVD {} ({:#04x})", index, raw),
            Self::Extension { index } => write!(f, "extension DTD {}", index),
        }
    }
}

/// One decoded candidate timing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingReport {
    pub source: TimingSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vic: Option<u8>,
    pub width: u32,
    pub height: u32,
    pub refresh_hz: Option<f64>,
    pub pixel_clock_khz: u32,
    pub interlaced: bool,
    pub native: bool,
    /// Whether this timing was compared against the running maximum
    pub eligible: bool,
}

impl TimingReport {
    fn from_detailed(source: TimingSource, dtd: &DetailedTiming) -> Self {
        Self {
            source,
            vic: None,
            width: dtd.width(),
            height: dtd.height(),
            refresh_hz: dtd.refresh_hz(),
            pixel_clock_khz: dtd.pixel_clock_khz(),
            interlaced: dtd.interlaced,
            native: false,
            eligible: false,
        }
    }

    fn from_vic(source: TimingSource, resolved: &ResolvedVic) -> Self {
        Self {
            source,
            vic: Some(resolved.vic),
            width: u32::from(resolved.timing.h_active),
            height: u32::from(resolved.timing.v_active),
            refresh_hz: Some(resolved.refresh_hz),
            pixel_clock_khz: resolved.timing.pixel_clock_khz,
            interlaced: resolved.timing.interlaced,
            native: resolved.native,
            eligible: false,
        }
    }
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}{}", self.width, self.height, if self.interlaced { "i" } else { "" })?;
        if let Some(vic) = self.vic {
            write!(f, " VIC {}", vic)?;
        }
        if self.native {
            write!(f, " (native)")?;
        }
        write!(f, ", pixel clock {} kHz", self.pixel_clock_khz)?;
        match self.refresh_hz {
            Some(hz) => write!(f, ", refresh rate {:.4} Hz", hz),
            None => write!(f, ", no refresh rate"),
        }
    }
}

/// Summary of the located CTA extension
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionSummary {
    pub slot: ExtensionSlot,
    pub revision: u8,
    pub dtd_start: u8,
    pub native_dtd_count: u8,
    pub flags: CtaFlags,
    pub data_blocks: Vec<DataBlockHeader>,
}

/// How the pass ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Header and CTA extension were found
    Validated,
    /// The pass stopped early; the result is the default rate
    Default { reason: String },
}

impl RefreshOutcome {
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default { .. })
    }
}

/// Result of a full decode pass
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub highest_hz: f64,
    pub outcome: RefreshOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<BaseBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<ExtensionSummary>,
    pub timings: Vec<TimingReport>,
}

impl RefreshReport {
    fn new() -> Self {
        Self {
            highest_hz: DEFAULT_REFRESH_HZ,
            outcome: RefreshOutcome::Default { reason: String::new() },
            base: None,
            extension: None,
            timings: Vec::new(),
        }
    }
}

/// Highest progressive refresh rate advertised by the record, at least 60 Hz
pub fn highest_refresh_rate(
    record: &EdidRecord,
    table: &dyn VicTable,
    observer: &mut dyn DecodeObserver,
) -> f64 {
    analyze(record, table, observer).highest_hz
}

/// Run a decode pass and keep every intermediate result
pub fn analyze(
    record: &EdidRecord,
    table: &dyn VicTable,
    observer: &mut dyn DecodeObserver,
) -> RefreshReport {
    let mut aggregator = Aggregator {
        record,
        table,
        observer,
        report: RefreshReport::new(),
    };

    if let Err(error) = aggregator.scan() {
        aggregator.observer.observe(DecodeEvent::Rejected(&error));
        aggregator.report.highest_hz = DEFAULT_REFRESH_HZ;
        aggregator.report.outcome = RefreshOutcome::Default { reason: error.to_string() };
    }

    let report = aggregator.report;
    aggregator.observer.observe(DecodeEvent::Finished { highest_hz: report.highest_hz });
    report
}

struct Aggregator<'a, 'o> {
    record: &'a EdidRecord,
    table: &'a dyn VicTable,
    observer: &'o mut dyn DecodeObserver,
    report: RefreshReport,
}

impl Aggregator<'_, '_> {
    /// Errors returned here end the pass with the default rate
    fn scan(&mut self) -> Result<()> {
        validate_magic(self.record)?;

        let base = BaseBlock::decode(self.record)?;
        for (index, dtd) in base.detailed_timings.iter().enumerate() {
            self.report_base_timing(index, dtd);
        }
        self.report.base = Some(base);

        let extension = CtaExtension::locate(self.record)?;
        let dtd_start = extension.dtd_start()?;
        self.summarize_extension(&extension)?;
        self.report.outcome = RefreshOutcome::Validated;

        if dtd_start != 0 {
            self.fold_video_data_block(&extension);
            self.fold_extension_timings(&extension)?;
        }
        Ok(())
    }

    fn report_base_timing(&mut self, index: usize, dtd: &DetailedTiming) {
        let source = TimingSource::Base { index };
        if !dtd.is_active() {
            self.observer.observe(DecodeEvent::Skipped {
                source,
                error: &EdidError::InactiveDescriptor,
            });
            return;
        }
        let timing = TimingReport::from_detailed(source, dtd);
        self.observer.observe(DecodeEvent::Timing(&timing));
        self.report.timings.push(timing);
    }

    fn summarize_extension(&mut self, extension: &CtaExtension<'_>) -> Result<()> {
        let summary = ExtensionSummary {
            slot: extension.slot(),
            revision: extension.revision()?,
            dtd_start: extension.dtd_start()?,
            native_dtd_count: extension.native_dtd_count()?,
            flags: extension.flags()?,
            data_blocks: extension.data_blocks()?.map_while(|header| header.ok()).collect(),
        };
        self.observer.observe(DecodeEvent::ExtensionLocated {
            slot: summary.slot,
            revision: summary.revision,
            dtd_start: summary.dtd_start,
            native_dtd_count: summary.native_dtd_count,
        });
        self.report.extension = Some(summary);
        Ok(())
    }

    fn fold_video_data_block(&mut self, extension: &CtaExtension<'_>) {
        let video = match extension.video_data_block() {
            Ok(video) => video,
            Err(error) => {
                self.observer.observe(DecodeEvent::Recovered(&error));
                return;
            }
        };
        self.observer.observe(DecodeEvent::VideoDataBlock { svd_count: video.len() });

        for (index, svd) in video.svds().enumerate() {
            let svd = match svd {
                Ok(svd) => svd,
                Err(error) => {
                    // Every later byte lies further past the end
                    self.observer.observe(DecodeEvent::Recovered(&error));
                    break;
                }
            };
            let source = TimingSource::Svd { index, raw: svd.raw() };
            match vic::resolve(self.table, svd) {
                Ok(resolved) => self.fold(TimingReport::from_vic(source, &resolved)),
                Err(error) => self.observer.observe(DecodeEvent::Skipped { source, error: &error }),
            }
        }
    }

    fn fold_extension_timings(&mut self, extension: &CtaExtension<'_>) -> Result<()> {
        for (index, dtd) in extension.detailed_timings()? {
            let source = TimingSource::Extension { index };
            match dtd.and_then(|dtd| dtd.usable_refresh_hz().map(|_| dtd)) {
                Ok(dtd) => self.fold(TimingReport::from_detailed(source, &dtd)),
                Err(error) => self.observer.observe(DecodeEvent::Skipped { source, error: &error }),
            }
        }
        Ok(())
    }

    /// Record a timing and raise the maximum if it is progressive
    fn fold(&mut self, mut timing: TimingReport) {
        if let Some(hz) = timing.refresh_hz.filter(|hz| hz.is_finite()) {
            if !timing.interlaced {
                timing.eligible = true;
                if hz > self.report.highest_hz {
                    self.report.highest_hz = hz;
                }
            }
        }
        self.observer.observe(DecodeEvent::Timing(&timing));
        self.report.timings.push(timing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dtd_bytes, CtaBlock, RecordBuilder};
    use crate::trace::NullObserver;
    use crate::vic::{CanonicalTiming, CtaVicTable};

    fn highest(record: &EdidRecord) -> f64 {
        highest_refresh_rate(record, &CtaVicTable, &mut NullObserver)
    }

    /// Keeps a line per event
    #[derive(Default)]
    struct EventLog {
        lines: Vec<String>,
    }

    impl DecodeObserver for EventLog {
        fn observe(&mut self, event: DecodeEvent<'_>) {
            let line = match event {
                DecodeEvent::Rejected(e) => format!("rejected: {}", e),
                DecodeEvent::ExtensionLocated { slot, .. } => format!("extension: {:?}", slot),
                DecodeEvent::VideoDataBlock { svd_count } => format!("video: {}", svd_count),
                DecodeEvent::Recovered(e) => format!("recovered: {}", e),
                DecodeEvent::Timing(t) => format!("timing: {}", t.source),
                DecodeEvent::Skipped { source, error } => format!("skipped: {}: {}", source, error),
                DecodeEvent::Finished { highest_hz } => format!("finished: {:.4}", highest_hz),
            };
            self.lines.push(line);
        }
    }

    #[test]
    fn test_magic_mismatch_returns_default() {
        let record = RecordBuilder::new()
            .set(0, 0x01)
            .cta(0, &CtaBlock::new().video(&[63]))
            .build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        assert_eq!(report.highest_hz, 60.0);
        assert!(report.outcome.is_default());
        assert!(report.timings.is_empty());
        assert!(report.base.is_none());
    }

    #[test]
    fn test_no_extension_returns_default() {
        let record = RecordBuilder::new()
            .base_dtd(0, dtd_bytes(53325, 2560, 1440, 160, 41, false))
            .build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        assert_eq!(report.highest_hz, 60.0);
        assert_eq!(
            report.outcome,
            RefreshOutcome::Default { reason: EdidError::NoExtension.to_string() }
        );
        assert_eq!(format!("{:.4}", report.highest_hz), "60.0000");
    }

    #[test]
    fn test_extension_not_found_returns_default() {
        let record = RecordBuilder::new().extension_count(1).build();
        let mut log = EventLog::default();
        assert_eq!(highest_refresh_rate(&record, &CtaVicTable, &mut log), 60.0);
        assert!(log.lines.iter().any(|l| l.starts_with("rejected: no CTA extension")));
    }

    #[test]
    fn test_base_descriptors_are_diagnostic_only() {
        let record = RecordBuilder::new()
            .base_dtd(0, dtd_bytes(7425, 1920, 1080, 280, 45, false))
            .base_dtd(1, dtd_bytes(53325, 2560, 1440, 160, 41, false))
            .cta(0, &CtaBlock::new().dtd_start(0))
            .build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        assert_eq!(report.outcome, RefreshOutcome::Validated);
        assert_eq!(report.highest_hz, 60.0);
        assert_eq!(report.timings.len(), 2);
        assert!(report.timings.iter().all(|t| !t.eligible));

        let first = report.timings[0].refresh_hz.unwrap();
        let expected = 7425.0 * 10_000.0 / (2200.0 * 1125.0);
        assert!((first - expected).abs() < 1e-3);
        assert!(report.timings[1].refresh_hz.unwrap() > 132.0);
    }

    #[test]
    fn test_zero_dtd_start_skips_extension_content() {
        let block = CtaBlock::new()
            .video(&[63])
            .dtd(dtd_bytes(53325, 2560, 1440, 160, 41, false))
            .dtd_start(0);
        let record = RecordBuilder::new().cta(0, &block).build();
        assert_eq!(highest(&record), 60.0);
    }

    #[test]
    fn test_spare_slot_recovery() {
        let block = CtaBlock::new().video(&[63]);
        let record = RecordBuilder::new()
            .cta(0, &CtaBlock::new().tag(0x10))
            .cta(1, &block)
            .build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        assert_eq!(report.extension.as_ref().unwrap().slot, ExtensionSlot::Spare2);
        assert!((report.highest_hz - 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_video_data_block_takes_highest_vic() {
        let record = RecordBuilder::new()
            .cta(0, &CtaBlock::new().video(&[0x80 | 16, 4]))
            .build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        let vics: Vec<_> = report.timings.iter().filter_map(|t| t.vic).collect();
        assert_eq!(vics, [16, 4]);
        assert!(report.timings[0].native);
        assert!((report.highest_hz - 60.0).abs() < 1e-9);

        let record = RecordBuilder::new()
            .cta(0, &CtaBlock::new().video(&[4, 64, 16]))
            .build();
        assert!((highest(&record) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_merges_svds_with_extension_descriptors() {
        let block = CtaBlock::new()
            .data_block(1, &[0x09, 0x07, 0x07])
            .video(&[16, 4])
            .dtd(dtd_bytes(53325, 2560, 1440, 160, 41, false))
            .dtd(dtd_bytes(14850, 1920, 1080, 280, 45, false));
        let record = RecordBuilder::new().cta(0, &block).build();
        let expected = 53325.0 * 10_000.0 / (2720.0 * 1481.0);
        assert!((highest(&record) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_interlaced_sources_never_raise_result() {
        let block = CtaBlock::new()
            .video(&[46, 5])
            .dtd(dtd_bytes(65535, 1920, 540, 100, 10, true));
        let record = RecordBuilder::new().cta(0, &block).build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        assert_eq!(report.highest_hz, 60.0);
        assert_eq!(report.timings.len(), 3);
        assert!(report.timings.iter().all(|t| t.interlaced && !t.eligible));
        assert!(report.timings[0].refresh_hz.unwrap() > 119.0);
    }

    #[test]
    fn test_invalid_and_unknown_vics_are_skipped() {
        let record = RecordBuilder::new()
            .cta(0, &CtaBlock::new().video(&[0x00, 0x80, 0xFF, 0xE0, 63]))
            .build();
        let mut log = EventLog::default();
        let report = analyze(&record, &CtaVicTable, &mut log);
        assert!((report.highest_hz - 120.0).abs() < 1e-6);
        assert_eq!(report.timings.len(), 1);
        let skipped = log.lines.iter().filter(|l| l.starts_with("skipped: SVD")).count();
        assert_eq!(skipped, 4);
        assert_eq!(log.lines.last().unwrap(), "finished: 120.0000");
    }

    #[test]
    fn test_high_vic_without_native_flag_raises_result() {
        // 0x76 is VIC 118, 3840x2160p120
        let record = RecordBuilder::new()
            .cta(0, &CtaBlock::new().video(&[0x10, 0x76]))
            .build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        assert!((report.highest_hz - 120.0).abs() < 1e-6);
        assert_eq!(report.timings.len(), 2);
        assert_eq!(report.timings[1].vic, Some(118));
        assert_eq!(report.timings[1].width, 3840);
        assert!(report.timings[1].eligible);
    }

    #[test]
    fn test_fallback_vic_above_192_raises_result() {
        // 0xDB has the high bit set and index 91, so the whole byte is VIC 219
        let record = RecordBuilder::new()
            .cta(0, &CtaBlock::new().video(&[0xDB]))
            .build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        assert!((report.highest_hz - 120.0).abs() < 1e-6);
        assert_eq!(report.timings[0].vic, Some(219));
        assert!(!report.timings[0].native);
    }

    #[test]
    fn test_degenerate_and_inactive_extension_descriptors() {
        let block = CtaBlock::new()
            .dtd(dtd_bytes(65535, 1, 1, 0, 0, false))
            .dtd(dtd_bytes(0, 1920, 1080, 280, 45, false))
            .dtd(dtd_bytes(29700, 1920, 1080, 280, 45, false));
        let record = RecordBuilder::new().cta(0, &block).build();
        let mut log = EventLog::default();
        let report = analyze(&record, &CtaVicTable, &mut log);
        assert!((report.highest_hz - 120.0).abs() < 1e-6);
        let logged = |line: &str| log.lines.iter().any(|l| l == line);
        assert!(logged("skipped: extension DTD 0: degenerate descriptor 1x1"));
        assert!(logged("recovered: no video data block before offset 0x04"));
        assert_eq!(report.timings.len(), 1);
    }

    #[test]
    fn test_descriptors_past_record_end_are_skipped() {
        let block = CtaBlock::new().video(&[63]).dtd_start(0x7F);
        let record = RecordBuilder::new().cta(2, &block).build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        assert_eq!(report.outcome, RefreshOutcome::Validated);
        assert!((report.highest_hz - 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_custom_table_without_entry_is_skipped() {
        static STANDARD: CtaVicTable = CtaVicTable;
        struct OnlyVic4;
        impl VicTable for OnlyVic4 {
            fn lookup(&self, vic: u8) -> Option<&CanonicalTiming> {
                if vic == 4 { STANDARD.lookup(4) } else { None }
            }
        }
        let record = RecordBuilder::new()
            .cta(0, &CtaBlock::new().video(&[63, 4]))
            .build();
        let report = analyze(&record, &OnlyVic4, &mut NullObserver);
        assert_eq!(report.timings.len(), 1);
        assert!((report.highest_hz - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_result_is_at_least_every_eligible_rate() {
        let block = CtaBlock::new()
            .video(&[1, 19, 47, 32])
            .dtd(dtd_bytes(24150, 1920, 1080, 160, 31, false));
        let record = RecordBuilder::new().cta(0, &block).build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        for timing in report.timings.iter().filter(|t| t.eligible) {
            assert!(report.highest_hz >= timing.refresh_hz.unwrap());
        }
        assert!(report.highest_hz >= 60.0);
    }

    #[test]
    fn test_report_serializes() {
        let record = RecordBuilder::new()
            .cta(0, &CtaBlock::new().video(&[16]))
            .build();
        let report = analyze(&record, &CtaVicTable, &mut NullObserver);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["status"], "validated");
        assert_eq!(json["extension"]["slot"], "primary");
        assert_eq!(json["timings"][0]["source"]["kind"], "svd");
        assert_eq!(json["timings"][0]["vic"], 16);
    }
}
