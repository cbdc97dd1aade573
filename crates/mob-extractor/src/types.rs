//! Request and response types for extraction

use mob_domain::ScrapedRecord;
use mob_gatekeeper::ValidationResult;

/// Request to extract a record from one document
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Raw markup of the species page
    pub html: String,

    /// Book identifier selecting the rule set
    pub book: String,

    /// Genus used when none is scraped
    pub genus_fallback: String,

    /// Source identifier (URL or file path), carried into citations
    pub source: String,
}

impl ExtractionRequest {
    /// Create a request with an empty source
    pub fn new(
        html: impl Into<String>,
        book: impl Into<String>,
        genus_fallback: impl Into<String>,
    ) -> Self {
        Self {
            html: html.into(),
            book: book.into(),
            genus_fallback: genus_fallback.into(),
            source: String::new(),
        }
    }

    /// Set the source identifier
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Result of an extraction
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Candidate record
    pub record: ScrapedRecord,

    /// Gate verdict for the record
    pub validation: ValidationResult,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMetadata {
    /// Book the request named
    pub book: String,

    /// Whether the `default` rule set was used
    pub used_default_rules: bool,

    /// Registry version the rules came from
    pub registry_version: u64,
}
