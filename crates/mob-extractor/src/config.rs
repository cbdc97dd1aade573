//! Configuration for the Extractor

use crate::ExtractorError;
use serde::{Deserialize, Serialize};

/// Corpus tunings the engine applies on top of the rule sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Author assigned to new species described without an explicit author
    pub authority: String,

    /// Base URL images are rewritten to
    pub cdn_base_url: String,

    /// Plate used when a document has none
    pub default_plate: String,

    /// Phrases that mark text as not a citation (matched lowercased)
    pub exclusion_phrases: Vec<String>,

    /// Books whose plates are named `p<digits>` and genitalia `<digits>.`
    pub numbered_plate_books: Vec<String>,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cdn_base_url.trim().is_empty() {
            return Err("cdn_base_url must not be empty".to_string());
        }
        if self.cdn_base_url.ends_with('/') {
            return Err("cdn_base_url must not end with '/'".to_string());
        }
        if self.exclusion_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err("exclusion_phrases must not contain empty entries".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Settings matching the Moths of Borneo corpus
    fn default() -> Self {
        Self {
            authority: "Holloway".to_string(),
            cdn_base_url: "https://cdn.mothsofborneo.com".to_string(),
            default_plate: "https://cdn.mothsofborneo.com/images/default.png".to_string(),
            exclusion_phrases: vec!["habitat preference".to_string()],
            numbered_plate_books: vec!["three".to_string()],
        }
    }
}

impl ExtractorConfig {
    /// Offline preset: images stay relative to a local mirror
    pub fn local(base_dir: &str) -> Self {
        let base = base_dir.trim_end_matches('/').to_string();
        Self {
            default_plate: format!("{}/images/default.png", base),
            cdn_base_url: base,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
