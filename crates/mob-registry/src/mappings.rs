//! Mappings: status vocabulary and book catalog

use crate::RegistryError;
use mob_domain::book::DEFAULT_BOOKS;
use mob_domain::status::DEFAULT_STATUSES;
use mob_domain::{BookCatalog, StatusVocabulary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Closed lists the engine treats as immutable for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mappings {
    /// Recognized taxonomic status tags
    #[serde(default = "default_statuses")]
    pub taxonomic_statuses: Vec<String>,

    /// Book number → book name
    #[serde(default = "default_books")]
    pub books: BTreeMap<String, String>,
}

impl Mappings {
    /// Parse mappings from TOML; missing lists take the corpus defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load mappings from a file, or the defaults when it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Status vocabulary built from the configured tags
    pub fn vocabulary(&self) -> StatusVocabulary {
        StatusVocabulary::new(&self.taxonomic_statuses)
    }

    /// Book catalog built from the configured entries
    pub fn catalog(&self) -> BookCatalog {
        BookCatalog::new(self.books.clone())
    }
}

impl Default for Mappings {
    fn default() -> Self {
        Self {
            taxonomic_statuses: default_statuses(),
            books: default_books(),
        }
    }
}

fn default_statuses() -> Vec<String> {
    DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect()
}

fn default_books() -> BTreeMap<String, String> {
    DEFAULT_BOOKS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
