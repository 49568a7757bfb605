/*!
Loading EDID dumps from disk.
*/

use anyhow::{Context, Result};
use edid_refresh::layout::RECORD_SIZE;
use edid_refresh::EdidRecord;
use std::path::Path;
use tracing::debug;

use crate::config::InputFormat;

/// Read a binary or hex-text EDID dump into a full-size record
pub fn load_record(path: &Path, format: InputFormat) -> Result<EdidRecord> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read EDID file: {}", path.display()))?;

    let is_hex = match format {
        InputFormat::Auto => EdidRecord::looks_like_hex(&content),
        InputFormat::Binary => false,
        InputFormat::Hex => true,
    };

    if is_hex {
        let text = std::str::from_utf8(&content)
            .with_context(|| format!("Hex dump is not valid text: {}", path.display()))?;
        let record = EdidRecord::from_hex_str(text)
            .with_context(|| format!("Failed to parse hex dump: {}", path.display()))?;
        debug!("Parsed hex dump from {}", path.display());
        return Ok(record);
    }

    if content.len() < RECORD_SIZE {
        debug!(
            "Read {} bytes from {}, zero-padding to {}",
            content.len(),
            path.display(),
            RECORD_SIZE
        );
    }
    Ok(EdidRecord::from_bytes(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

    #[test]
    fn test_binary_input_is_padded() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&HEADER).unwrap();

        let record = load_record(file.path(), InputFormat::Auto).unwrap();
        assert_eq!(&record.as_bytes()[..8], &HEADER);
        assert!(record.as_bytes()[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_hex_input_is_detected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "00ffffffffffff00").unwrap();
        writeln!(file, "10ac").unwrap();

        let record = load_record(file.path(), InputFormat::Auto).unwrap();
        assert_eq!(&record.as_bytes()[..8], &HEADER);
        assert_eq!(record.read_u16_be_at(8).unwrap(), 0x10AC);

        let record = load_record(file.path(), InputFormat::Binary).unwrap();
        assert_eq!(record.read_u8_at(0).unwrap(), b'0');
    }

    #[test]
    fn test_forced_hex_rejects_binary() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&HEADER).unwrap();
        assert!(load_record(file.path(), InputFormat::Hex).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_record(&dir.path().join("missing.bin"), InputFormat::Auto).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read EDID file"));
    }
}
