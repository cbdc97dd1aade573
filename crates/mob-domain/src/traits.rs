//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the engine and the outside
//! world. Implementations live in other crates.

use crate::{RuleSet, ScrapedRecord};
use std::collections::BTreeMap;

/// Durable storage of the rule configuration
///
/// Implemented by the registry crate (TOML file) and by tests (in memory).
pub trait RuleStore {
    /// Error type for store operations
    type Error;

    /// Load every rule set, keyed by book identifier (including `default`)
    fn load_rules(&self) -> Result<BTreeMap<String, RuleSet>, Self::Error>;

    /// Replace the stored rule sets
    fn save_rules(&self, rules: &BTreeMap<String, RuleSet>) -> Result<(), Self::Error>;
}

/// Persistence collaborator that receives accepted records
pub trait RecordSink {
    /// Error type for persistence
    type Error;

    /// Store one record for a book
    fn persist(&mut self, book: &str, record: &ScrapedRecord) -> Result<(), Self::Error>;
}
