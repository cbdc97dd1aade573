//! Parsed citation tuple

use serde::{Deserialize, Serialize};

/// Sentinel for a citation part that was not found
pub const NOT_AVAILABLE: &str = "N/A";

/// Pattern tag of a rejected citation
pub const INVALID_PATTERN: &str = "[INVALID CITATION]";

/// A citation broken into its parts
///
/// Every part holds [`NOT_AVAILABLE`] rather than being absent, so formatting
/// never branches on missing keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCitation {
    /// Name as cited (genus, species, author)
    pub synonym: String,

    /// Year or year expression ("1931", "[1892] 1893", "1931 (nec 1930)")
    pub year: String,

    /// Publication title or author of the work
    pub publication: String,

    /// Volume and page reference ("12: 45-50")
    pub page_reference: String,

    /// Editorial remark
    pub comment: String,

    /// Diagnostic tag describing which parts were recognized
    pub pattern: String,

    /// Input text the tuple was parsed from
    pub original: String,

    /// Where the citation came from (URL or document id)
    pub source: String,
}

impl ParsedCitation {
    /// Tuple with every part unavailable
    pub fn empty(original: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            synonym: NOT_AVAILABLE.to_string(),
            year: NOT_AVAILABLE.to_string(),
            publication: NOT_AVAILABLE.to_string(),
            page_reference: NOT_AVAILABLE.to_string(),
            comment: NOT_AVAILABLE.to_string(),
            pattern: "Unrecognized".to_string(),
            original: original.into(),
            source: source.into(),
        }
    }

    /// Tuple for text that was rejected outright
    pub fn invalid(original: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            pattern: INVALID_PATTERN.to_string(),
            ..Self::empty(original, source)
        }
    }

    /// Whether the text was rejected
    pub fn is_invalid(&self) -> bool {
        self.pattern == INVALID_PATTERN
    }
}

/// Whether a citation part holds a real value
pub fn is_available(part: &str) -> bool {
    !part.is_empty() && part != NOT_AVAILABLE
}
