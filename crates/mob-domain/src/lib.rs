//! MoB Domain Layer
//!
//! Core data model for the taxonomic scraping engine. Everything here is
//! plain data plus the trait seams other crates implement; there is no I/O.
//!
//! ## Key Concepts
//!
//! - **Field rule**: selector + occurrence index + extraction method
//! - **Rule set**: the field rules for one book, with a `default` fallback
//! - **Status vocabulary**: fixed list of tags such as "sp. n."
//! - **Scraped record**: name, genus, author, status tags, body, citations
//! - **Parsed citation**: synonym / year / publication / page reference / comment

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod book;
pub mod citation;
pub mod field;
pub mod method;
pub mod record;
pub mod rule;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use book::BookCatalog;
pub use citation::{ParsedCitation, INVALID_PATTERN, NOT_AVAILABLE};
pub use field::Field;
pub use method::Method;
pub use record::{Plate, ScrapedRecord};
pub use rule::{BookOptions, FieldRule, RuleSet};
pub use status::StatusVocabulary;

/// Book identifier of the fallback rule set
pub const DEFAULT_BOOK: &str = "default";
