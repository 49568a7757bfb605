/*!
Rendering a refresh report for stdout.
*/

use anyhow::{Context, Result};
use edid_refresh::{RefreshOutcome, RefreshReport};
use std::fmt::Write;

use crate::config::{OutputConfig, OutputFormat};

/// Format the report according to the output settings.
///
/// The text result line is surrounded by blank lines once printed.
pub fn render(report: &RefreshReport, config: &OutputConfig) -> Result<String> {
    match config.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report)
                .with_context(|| "Failed to serialize report to JSON")
        }
        OutputFormat::Text => Ok(render_text(report, config)),
    }
}

fn render_text(report: &RefreshReport, config: &OutputConfig) -> String {
    let mut out = String::new();

    if config.verbose {
        if let Some(base) = &report.base {
            let _ = writeln!(
                out,
                "Display: {} product {:#06x}, EDID {}.{}, {} extension(s)",
                base.manufacturer,
                base.product_code,
                base.version,
                base.revision,
                base.extension_count
            );
        }
        if let Some(extension) = &report.extension {
            let _ = writeln!(
                out,
                "CTA extension in {:?} slot, revision {}, {} data block(s)",
                extension.slot,
                extension.revision,
                extension.data_blocks.len()
            );
        }
        for timing in &report.timings {
            let marker = if timing.eligible { '*' } else { ' ' };
            let _ = writeln!(out, "{} {}: {}", marker, timing.source, timing);
        }
        if let RefreshOutcome::Default { reason } = &report.outcome {
            let _ = writeln!(out, "Falling back to default: {}", reason);
        }
    }

    let _ = writeln!(
        out,
        "\nDetected highest progressive refresh rate: {:.*} Hz",
        config.precision, report.highest_hz
    );
    out
}
