//! Record module - the structured output of one scraped document

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A plate image with its specimen label (e.g. "♂ (holotype)")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plate {
    /// CDN URL of the image
    pub url: String,

    /// Sex symbol and type designation, possibly empty
    #[serde(default)]
    pub label: String,
}

/// Candidate record assembled from one document
///
/// Created fresh per document by the extractor, checked by the gatekeeper
/// and then handed to a [`RecordSink`](crate::traits::RecordSink).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrapedRecord {
    /// Species epithet, "Unknown" when nothing was found
    pub name: String,

    /// Taxonomic author, if any was found or inferred
    pub author: Option<String>,

    /// Genus, falling back to the caller-supplied context
    pub genus: String,

    /// Status tags detected in the name block
    pub taxonomic_status: BTreeSet<String>,

    /// Cleaned Markdown body
    pub body_content: String,

    /// Formatted citation lines; never contains empty strings
    pub citations: Vec<String>,

    /// Genus exactly as scraped, before the fallback was applied
    pub scraped_genus_raw: String,

    /// Plate images
    #[serde(default)]
    pub plates: Vec<Plate>,

    /// Genitalia images
    #[serde(default)]
    pub genitalia: Vec<String>,

    /// Any other images
    #[serde(default)]
    pub misc_images: Vec<String>,
}

impl ScrapedRecord {
    /// File slug: `<genus>-<name>`
    ///
    /// ```
    /// use mob_domain::ScrapedRecord;
    ///
    /// let record = ScrapedRecord {
    ///     name: "sp. 3".to_string(),
    ///     genus: "Eupterote".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(record.slug(), "eupterote-sp-3");
    /// ```
    pub fn slug(&self) -> String {
        let name = self
            .name
            .to_lowercase()
            .replace("sp. ", "sp-")
            .replace(' ', "-")
            .replace(['?', '.'], "");
        let genus: String = self
            .genus
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase())
            .collect();
        format!("{}-{}", genus, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_plain() {
        let record = ScrapedRecord {
            name: "albipuncta".to_string(),
            genus: "Cyana".to_string(),
            ..Default::default()
        };
        assert_eq!(record.slug(), "cyana-albipuncta");
    }

    #[test]
    fn test_slug_strips_punctuation() {
        let record = ScrapedRecord {
            name: "?nigra".to_string(),
            genus: " (Cyana) ".to_string(),
            ..Default::default()
        };
        assert_eq!(record.slug(), "cyana-nigra");
    }
}
