//! Field module - the record fields a rule can scrape

use serde::{Deserialize, Serialize};
use std::fmt;

/// A record field that can be targeted by a [`FieldRule`](crate::FieldRule)
///
/// The order of [`Field::ALL`] is the order fields are resolved, reported
/// and refined in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Species epithet (e.g. "species" or "sp. 3")
    Name,

    /// Genus the species is filed under
    Genus,

    /// Taxonomic author of the name
    Author,

    /// Bibliographic citation line
    Citation,

    /// Body text of the account
    Content,
}

impl Field {
    /// Every field, in resolution order
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Genus,
        Field::Author,
        Field::Citation,
        Field::Content,
    ];

    /// Get the field name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Genus => "genus",
            Field::Author => "author",
            Field::Citation => "citation",
            Field::Content => "content",
        }
    }

    /// Parse a field from a string
    ///
    /// Accepts the legacy `<field>_selector` spelling as well.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let key = lower.strip_suffix("_selector").unwrap_or(&lower);
        match key {
            "name" => Some(Field::Name),
            "genus" => Some(Field::Genus),
            "author" => Some(Field::Author),
            "citation" => Some(Field::Citation),
            "content" => Some(Field::Content),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid field: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_legacy_selector_suffix() {
        assert_eq!(Field::parse("name_selector"), Some(Field::Name));
        assert_eq!(Field::parse("Content_Selector"), Some(Field::Content));
    }

    #[test]
    fn test_unknown_field() {
        assert!(Field::parse("plates").is_none());
        assert!("plates".parse::<Field>().is_err());
    }
}
