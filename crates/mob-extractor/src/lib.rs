//! MoB Extractor
//!
//! Turns species pages into structured records using declarative rules.
//!
//! # Overview
//!
//! Each document is resolved field by field against the book's rule set,
//! the identity fields are assembled (name, genus, author, status tags), the
//! body is converted to sectioned Markdown, citations are parsed and
//! re-formatted, images are sorted into plates, and the finished record is
//! handed to the Gatekeeper.
//!
//! # Architecture
//!
//! ```text
//! HTML → Document → FieldRules → Assembler → ScrapedRecord → Gatekeeper
//! ```
//!
//! # Example Usage
//!
//! ```
//! use mob_extractor::{Extractor, ExtractorConfig, ExtractionRequest};
//! use mob_gatekeeper::Gatekeeper;
//! use mob_registry::RuleRegistry;
//!
//! let registry = RuleRegistry::from_toml(r#"
//!     [default.name]
//!     selector = "b"
//!     index = 0
//! "#).unwrap();
//! let extractor = Extractor::new(Gatekeeper::default_config(), ExtractorConfig::default());
//!
//! let request = ExtractionRequest::new(
//!     "<b>Cyana albipuncta Holloway</b>",
//!     "seven",
//!     "Cyana",
//! );
//! let result = extractor.extract(&registry, &request).unwrap();
//!
//! assert_eq!(result.record.name, "albipuncta");
//! assert_eq!(result.record.author.as_deref(), Some("Holloway"));
//! assert!(result.metadata.used_default_rules);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod types;

pub mod assemble;
pub mod citation;
pub mod content;
pub mod images;
pub mod markdown;
pub mod methods;
pub mod policy;
pub mod query;
pub mod suggest;


pub use citation::{format_citation, format_citations, parse_citation, CitationParser};
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use policy::{AuthorPolicy, CorpusAuthorPolicy};
pub use query::Document;
pub use suggest::{infer_method, suggest_selectors, Suggestion};
pub use types::{ExtractionMetadata, ExtractionRequest, ExtractionResult};
