//! Codec configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::{AugmentedFormat, BARS_HEADER_SIZE, MINUTE_BARS_TRAILER_SIZE};

/// Main configuration for the codec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Bars file layout.
    pub bars: BarsLayout,
    /// Augmented bars header generation.
    pub augmented_format: AugmentedFormat,
}

impl CodecConfig {
    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bars.trailer_bytes >= crate::layout::BAR_SIZE {
            return Err(Error::config(format!(
                "bars trailer of {} bytes would hide whole records",
                self.bars.trailer_bytes
            )));
        }
        Ok(())
    }
}

/// Bars file layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarsLayout {
    /// Bytes at the end of the file that belong to no record.
    pub trailer_bytes: usize,
}

impl BarsLayout {
    /// Layout of minute bar files, which end in a 2-byte trailer.
    pub fn minute() -> Self {
        Self {
            trailer_bytes: MINUTE_BARS_TRAILER_SIZE,
        }
    }

    /// Header plus trailer: bytes that never hold record data.
    pub fn overhead(&self) -> usize {
        BARS_HEADER_SIZE + self.trailer_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.augmented_format, AugmentedFormat::Wide);
        assert_eq!(config.bars.trailer_bytes, 0);
        assert_eq!(BarsLayout::minute().overhead(), 12);
    }

    #[test]
    fn test_from_json_partial() {
        let config = CodecConfig::from_json_str(r#"{"augmented_format": "narrow"}"#).unwrap();
        assert_eq!(config.augmented_format, AugmentedFormat::Narrow);
        assert_eq!(config.bars, BarsLayout::default());
    }

    #[test]
    fn test_rejects_oversized_trailer() {
        let err = CodecConfig::from_json_str(r#"{"bars": {"trailer_bytes": 64}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            CodecConfig::from_json_str("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bars": {{"trailer_bytes": 2}}}}"#).unwrap();
        let config = CodecConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.bars, BarsLayout::minute());
    }
}
