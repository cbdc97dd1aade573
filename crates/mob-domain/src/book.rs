//! Book catalog - correspondence between book numbers and book names

use std::collections::BTreeMap;

/// Book numbers as they appear in legacy URLs (`/part-15-16/`), with names
pub const DEFAULT_BOOKS: [(&str, &str); 18] = [
    ("1", "one"),
    ("2", "two"),
    ("3", "three"),
    ("4", "four"),
    ("5", "five"),
    ("6", "six"),
    ("7", "seven"),
    ("8", "eight"),
    ("9", "nine"),
    ("10", "ten"),
    ("11", "eleven"),
    ("12", "twelve"),
    ("13", "thirteen"),
    ("14", "fourteen"),
    ("15-16", "fifteen"),
    ("16", "sixteen"),
    ("17", "seventeen"),
    ("18", "eighteen"),
];

/// Immutable book number ↔ book name mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCatalog {
    by_number: BTreeMap<String, String>,
}

impl BookCatalog {
    /// Build a catalog from `(number, name)` pairs
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            by_number: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Book name for a legacy part number (e.g. "13" → "thirteen")
    pub fn name_for(&self, number: &str) -> Option<&str> {
        self.by_number.get(number.trim()).map(String::as_str)
    }

    /// Numeric book id used in CDN paths
    ///
    /// Ranged parts ("15-16") map to their first number.
    pub fn number_for(&self, name: &str) -> Option<&str> {
        self.by_number
            .iter()
            .find(|(_, v)| v.as_str() == name)
            .map(|(k, _)| k.split('-').next().unwrap_or(k))
    }

    /// All `(number, name)` entries
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_number.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for BookCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_BOOKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_ways() {
        let catalog = BookCatalog::default();
        assert_eq!(catalog.name_for("13"), Some("thirteen"));
        assert_eq!(catalog.number_for("thirteen"), Some("13"));
    }

    #[test]
    fn test_ranged_part() {
        let catalog = BookCatalog::default();
        assert_eq!(catalog.name_for("15-16"), Some("fifteen"));
        assert_eq!(catalog.number_for("fifteen"), Some("15"));
    }

    #[test]
    fn test_unknown_book() {
        let catalog = BookCatalog::default();
        assert!(catalog.number_for("nineteen").is_none());
    }
}
