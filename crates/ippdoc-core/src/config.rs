// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction configuration.
//
// The attribute name and content-type prefix are settings, not protocol
// constants: `job-data` was read off a packet capture and other print
// services are free to use a different attribute.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IppdocError, Result};
use crate::types::Framing;

/// Default attribute carrying the embedded document.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "job-data";

/// Default content-type prefix of the wanted body part.
pub const DEFAULT_CONTENT_TYPE_PREFIX: &str = "application/pdf";

/// Settings for one extraction pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Name of the attribute whose value holds the multipart document.
    pub target_attribute_name: String,
    /// Content-type prefix a body part must start with to be selected.
    pub target_content_type_prefix: String,
    /// How the response buffer is framed.
    pub framing: Framing,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            target_attribute_name: DEFAULT_ATTRIBUTE_NAME.into(),
            target_content_type_prefix: DEFAULT_CONTENT_TYPE_PREFIX.into(),
            framing: Framing::Bare,
        }
    }
}

impl ExtractionConfig {
    pub fn new(attribute_name: impl Into<String>, content_type_prefix: impl Into<String>) -> Self {
        Self {
            target_attribute_name: attribute_name.into(),
            target_content_type_prefix: content_type_prefix.into(),
            framing: Framing::Bare,
        }
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    /// Check the settings before building a pipeline from them.
    ///
    /// An empty content-type prefix is allowed and selects the first part.
    pub fn validate(&self) -> Result<()> {
        if self.target_attribute_name.is_empty() {
            return Err(IppdocError::InvalidConfig(
                "target_attribute_name must not be empty".into(),
            ));
        }
        if self.target_attribute_name.len() > usize::from(u16::MAX) {
            return Err(IppdocError::InvalidConfig(
                "target_attribute_name is longer than any encodable name".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_job_data_pdf() {
        let config = ExtractionConfig::default();
        assert_eq!(config.target_attribute_name, "job-data");
        assert_eq!(config.target_content_type_prefix, "application/pdf");
        assert_eq!(config.framing, Framing::Bare);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_attribute_name_is_rejected() {
        let config = ExtractionConfig::new("", "application/pdf");
        assert!(matches!(
            config.validate(),
            Err(IppdocError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_prefix_is_accepted() {
        assert!(ExtractionConfig::new("job-data", "").validate().is_ok());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config =
            ExtractionConfig::new("document-data", "application/postscript").with_framing(Framing::Message);

        config.save(&path).unwrap();
        let loaded = ExtractionConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "framing": "message" }"#).unwrap();

        let loaded = ExtractionConfig::load(&path).unwrap();
        assert_eq!(loaded.target_attribute_name, DEFAULT_ATTRIBUTE_NAME);
        assert_eq!(loaded.framing, Framing::Message);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExtractionConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(IppdocError::Io(_))));
    }

    #[test]
    fn load_malformed_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ExtractionConfig::load(&path),
            Err(IppdocError::Serialization(_))
        ));
    }
}
