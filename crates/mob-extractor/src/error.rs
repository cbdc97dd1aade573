//! Error types for the Extractor

use mob_registry::RegistryError;
use thiserror::Error;

/// Errors that can occur during extraction
///
/// Resolution misses and rejected citations are not errors: they surface as
/// empty fields and invalid citation tuples respectively.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Selector could not be parsed
    #[error("Invalid selector '{selector}': {message}")]
    Selector {
        /// The offending selector
        selector: String,
        /// Parser message
        message: String,
    },

    /// No rule set for the book and no default
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<RegistryError> for ExtractorError {
    fn from(e: RegistryError) -> Self {
        ExtractorError::Config(e.to_string())
    }
}

impl From<toml::de::Error> for ExtractorError {
    fn from(e: toml::de::Error) -> Self {
        ExtractorError::TomlParse(e.to_string())
    }
}
