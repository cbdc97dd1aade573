//! Extraction methods - the closed set of text transforms a rule can apply

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the raw text a selector yields is turned into a field value
///
/// Methods are stored in configuration by name (`full_text`, `position_-1`,
/// `build_citation_string`, ...). A name outside the known set is kept as
/// [`Method::Unknown`] so it survives a save, and behaves like
/// [`Method::FullText`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Method {
    /// The whole normalized text
    #[default]
    FullText,

    /// Token at a 1-based position; negative counts from the end
    Position(i64),

    /// First token that is lowercase (digits accepted)
    FirstLowercase,

    /// First token in title case
    FirstTitlecase,

    /// First token
    FirstWord,

    /// Last token that is not a taxonomic status tag
    LastWord,

    /// Citation sub-extraction over the matched markup
    BuildCitationString,

    /// Unrecognized method name, applied as identity
    Unknown(String),
}

impl Method {
    /// Parse a method name
    ///
    /// Never fails: unrecognized names become [`Method::Unknown`].
    pub fn parse(s: &str) -> Self {
        let name = s.trim();
        match name {
            "full_text" | "" => Method::FullText,
            "first_lowercase" => Method::FirstLowercase,
            "first_titlecase" => Method::FirstTitlecase,
            "first_word" => Method::FirstWord,
            "last_word" => Method::LastWord,
            "build_citation_string" => Method::BuildCitationString,
            other => match other.strip_prefix("position_").and_then(parse_position) {
                Some(pos) => Method::Position(pos),
                None => Method::Unknown(other.to_string()),
            },
        }
    }

    /// Whether the method returns its input unchanged
    pub fn is_identity(&self) -> bool {
        matches!(self, Method::FullText | Method::Unknown(_))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::FullText => f.write_str("full_text"),
            Method::Position(pos) => write!(f, "position_{}", pos),
            Method::FirstLowercase => f.write_str("first_lowercase"),
            Method::FirstTitlecase => f.write_str("first_titlecase"),
            Method::FirstWord => f.write_str("first_word"),
            Method::LastWord => f.write_str("last_word"),
            Method::BuildCitationString => f.write_str("build_citation_string"),
            Method::Unknown(name) => f.write_str(name),
        }
    }
}

impl std::str::FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Method {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.to_string()
    }
}

/// Integer position, saturating when it does not fit in an `i64`
///
/// A saturated position is out of range for any text, so it still resolves
/// to nothing instead of falling back to identity.
fn parse_position(s: &str) -> Option<i64> {
    if let Ok(pos) = s.parse::<i64>() {
        return Some(pos);
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}
