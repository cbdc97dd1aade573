//! Error types for the rule registry

use thiserror::Error;

/// Errors that can occur while loading, querying or saving rules
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Neither the book nor the `default` rule set exists
    #[error("No rule set for book '{book}' and no default rule set")]
    NoRuleSet {
        /// Requested book identifier
        book: String,
    },

    /// I/O error reading or writing a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// An in-memory store's lock was poisoned by a panicking writer
    #[error("Rule store lock poisoned: {0}")]
    Poisoned(String),

    /// Configuration could not be serialized
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
