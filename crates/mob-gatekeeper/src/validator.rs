//! Record validation logic

use crate::ValidationConfig;
use mob_domain::{Field, ScrapedRecord, StatusVocabulary};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

/// Result of record validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the record passed validation
    pub status: ValidationStatus,

    /// Fields that failed (empty when accepted)
    pub failing_fields: BTreeSet<Field>,

    /// Why each field failed, in field order
    pub reasons: Vec<RejectionReason>,

    /// Share of checked fields that passed (0.0-1.0)
    pub quality_score: f64,
}

impl ValidationResult {
    /// Whether the record may be persisted without review
    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Record accepted
    Accepted,

    /// Record rejected; route to refinement or skip
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Field has no value
    Missing(Field),

    /// Field holds the "Unknown" sentinel
    Unknown(Field),

    /// Field holds a taxonomic status tag instead of a value
    StatusTag {
        /// Offending field
        field: Field,
        /// The tag found
        value: String,
    },

    /// Genus has more than one token
    MultiTokenGenus(String),

    /// Author is a placeholder abbreviation such as "spp."
    PlaceholderAuthor(String),

    /// Body still contains markup angle brackets
    MarkupInContent,

    /// Body is shorter than the configured minimum
    ContentTooShort {
        /// Trimmed length in characters
        length: usize,
        /// Required minimum
        minimum: usize,
    },
}

impl RejectionReason {
    /// The field this reason applies to
    pub fn field(&self) -> Field {
        match self {
            RejectionReason::Missing(field)
            | RejectionReason::Unknown(field)
            | RejectionReason::StatusTag { field, .. } => *field,
            RejectionReason::MultiTokenGenus(_) => Field::Genus,
            RejectionReason::PlaceholderAuthor(_) => Field::Author,
            RejectionReason::MarkupInContent | RejectionReason::ContentTooShort { .. } => {
                Field::Content
            }
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Missing(field) => write!(f, "{} is empty", field),
            RejectionReason::Unknown(field) => write!(f, "{} is 'Unknown'", field),
            RejectionReason::StatusTag { field, value } => {
                write!(f, "{} is the status tag '{}'", field, value)
            }
            RejectionReason::MultiTokenGenus(genus) => {
                write!(f, "genus '{}' has more than one word", genus)
            }
            RejectionReason::PlaceholderAuthor(author) => {
                write!(f, "author '{}' is a placeholder", author)
            }
            RejectionReason::MarkupInContent => f.write_str("content contains raw markup"),
            RejectionReason::ContentTooShort { length, minimum } => write!(
                f,
                "content is {} characters, minimum is {}",
                length, minimum
            ),
        }
    }
}

/// The Gatekeeper validates records before persistence
///
/// Validation is a pure function of the record, the configuration and the
/// status vocabulary.
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    config: ValidationConfig,
    vocabulary: StatusVocabulary,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            vocabulary: StatusVocabulary::default(),
        }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Use a status vocabulary other than the built-in one
    pub fn with_vocabulary(mut self, vocabulary: StatusVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a record against the configured rules
    pub fn validate(&self, record: &ScrapedRecord) -> ValidationResult {
        let mut reasons = Vec::new();

        // 1. Name
        reasons.extend(self.check_identifier(Field::Name, &record.name));

        // 2. Genus
        match self.check_identifier(Field::Genus, &record.genus) {
            Some(reason) => reasons.push(reason),
            None => {
                if self.config.single_token_genus
                    && record.genus.split_whitespace().count() > 1
                {
                    reasons.push(RejectionReason::MultiTokenGenus(record.genus.clone()));
                }
            }
        }

        // 3. Author
        reasons.extend(self.check_author(record.author.as_deref()));

        // 4. Body content
        reasons.extend(self.check_content(&record.body_content));

        let failing_fields: BTreeSet<Field> = reasons.iter().map(RejectionReason::field).collect();

        let status = if failing_fields.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };

        let checked = Field::ALL.len() - 1; // citation is never gated
        let quality_score = (checked - failing_fields.len()) as f64 / checked as f64;

        for reason in &reasons {
            debug!("Rejected: {}", reason);
        }
        info!(
            "Validated '{} {}': {:?} ({} failing)",
            record.genus,
            record.name,
            status,
            failing_fields.len()
        );

        ValidationResult {
            status,
            failing_fields,
            reasons,
            quality_score,
        }
    }

    /// Name and genus share one rule
    fn check_identifier(&self, field: Field, value: &str) -> Option<RejectionReason> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Some(RejectionReason::Missing(field));
        }
        if trimmed == "Unknown" {
            return Some(RejectionReason::Unknown(field));
        }
        if self.vocabulary.contains(trimmed) {
            return Some(RejectionReason::StatusTag {
                field,
                value: trimmed.to_string(),
            });
        }
        None
    }

    fn check_author(&self, author: Option<&str>) -> Option<RejectionReason> {
        let author = match author.map(str::trim).filter(|a| !a.is_empty()) {
            Some(author) => author,
            None if self.config.require_author => {
                return Some(RejectionReason::Missing(Field::Author))
            }
            None => return None,
        };

        let bare = author
            .trim_matches(|c: char| c == '\'' || c == '.' || c == ',' || c.is_whitespace())
            .to_lowercase();
        let is_placeholder = self
            .config
            .author_placeholders
            .iter()
            .any(|p| p.trim().trim_end_matches('.').to_lowercase() == bare);

        if is_placeholder {
            Some(RejectionReason::PlaceholderAuthor(author.to_string()))
        } else {
            None
        }
    }

    fn check_content(&self, content: &str) -> Option<RejectionReason> {
        if content.contains('<') || content.contains('>') {
            return Some(RejectionReason::MarkupInContent);
        }
        let length = content.trim().chars().count();
        if length < self.config.min_content_length {
            return Some(RejectionReason::ContentTooShort {
                length,
                minimum: self.config.min_content_length,
            });
        }
        None
    }
}
