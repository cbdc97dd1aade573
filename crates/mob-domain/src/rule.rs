//! Rule module - declarative field rules and per-book rule sets

use crate::{Field, Method};
use serde::{Deserialize, Serialize};

/// Declarative instruction for extracting one record field
///
/// A rule resolves `selector` against the document, takes the match at
/// `index` (negative counts from the end) and applies `method` to its text.
/// When the primary selector resolves to nothing, `fallbacks` are tried in
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Document-tree query (CSS selector)
    #[serde(default)]
    pub selector: String,

    /// Occurrence index among the matches
    #[serde(default)]
    pub index: i64,

    /// Text transform applied to the resolved text
    #[serde(default)]
    pub method: Method,

    /// Rules tried when this one resolves to empty text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<FieldRule>,
}

impl FieldRule {
    /// Create a rule taking the full text of the match at `index`
    pub fn new(selector: impl Into<String>, index: i64) -> Self {
        Self {
            selector: selector.into(),
            index,
            method: Method::FullText,
            fallbacks: Vec::new(),
        }
    }

    /// Set the extraction method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Append a fallback rule
    pub fn with_fallback(mut self, fallback: FieldRule) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    /// A rule without a selector scrapes nothing
    pub fn is_absent(&self) -> bool {
        self.selector.trim().is_empty()
    }
}

/// Per-book switches that are not tied to a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookOptions {
    /// Concatenate every content match instead of taking the one at `index`
    pub join_all_content: bool,

    /// Repair scanned male/female glyphs in the body text
    pub ocr_symbol_repair: bool,
}

impl BookOptions {
    fn is_default(&self) -> bool {
        *self == BookOptions::default()
    }
}

/// The active rules for one book
///
/// Fields without a rule are simply not scraped. Rule sets are replaced as a
/// whole; see the registry crate for versioned updates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rule for the species name (or the combined name block)
    #[serde(default, alias = "name_selector", skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldRule>,

    /// Rule for the genus
    #[serde(default, alias = "genus_selector", skip_serializing_if = "Option::is_none")]
    pub genus: Option<FieldRule>,

    /// Rule for the author
    #[serde(default, alias = "author_selector", skip_serializing_if = "Option::is_none")]
    pub author: Option<FieldRule>,

    /// Rule for the citation
    #[serde(default, alias = "citation_selector", skip_serializing_if = "Option::is_none")]
    pub citation: Option<FieldRule>,

    /// Rule for the body content
    #[serde(default, alias = "content_selector", skip_serializing_if = "Option::is_none")]
    pub content: Option<FieldRule>,

    /// Book-level switches
    #[serde(default, skip_serializing_if = "BookOptions::is_default")]
    pub options: BookOptions,
}

impl RuleSet {
    /// Get the rule for a field, treating selector-less rules as absent
    pub fn get(&self, field: Field) -> Option<&FieldRule> {
        self.slot(field).as_ref().filter(|rule| !rule.is_absent())
    }

    /// Whether a usable rule exists for the field
    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Replace the rule for a field
    pub fn set(&mut self, field: Field, rule: FieldRule) {
        *self.slot_mut(field) = Some(rule);
    }

    /// Builder-style variant of [`RuleSet::set`]
    pub fn with(mut self, field: Field, rule: FieldRule) -> Self {
        self.set(field, rule);
        self
    }

    /// Drop the rule for a field, returning it
    pub fn remove(&mut self, field: Field) -> Option<FieldRule> {
        self.slot_mut(field).take()
    }

    /// Usable rules in resolution order
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldRule)> {
        Field::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|rule| (field, rule)))
    }

    fn slot(&self, field: Field) -> &Option<FieldRule> {
        match field {
            Field::Name => &self.name,
            Field::Genus => &self.genus,
            Field::Author => &self.author,
            Field::Citation => &self.citation,
            Field::Content => &self.content,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<FieldRule> {
        match field {
            Field::Name => &mut self.name,
            Field::Genus => &mut self.genus,
            Field::Author => &mut self.author,
            Field::Citation => &mut self.citation,
            Field::Content => &mut self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_rule_is_not_returned() {
        let rules = RuleSet::default().with(Field::Author, FieldRule::new("  ", 0));
        assert!(rules.get(Field::Author).is_none());
        assert!(!rules.has(Field::Author));
    }

    #[test]
    fn test_fields_in_resolution_order() {
        let rules = RuleSet::default()
            .with(Field::Content, FieldRule::new("p", 0))
            .with(Field::Name, FieldRule::new("b", 0));

        let order: Vec<Field> = rules.fields().map(|(field, _)| field).collect();
        assert_eq!(order, vec![Field::Name, Field::Content]);
    }

    #[test]
    fn test_remove() {
        let mut rules = RuleSet::default().with(Field::Genus, FieldRule::new("i", 1));
        assert!(rules.remove(Field::Genus).is_some());
        assert!(rules.genus.is_none());
    }

    #[test]
    fn test_builder() {
        let rule = FieldRule::new("b", -1)
            .with_method(Method::LastWord)
            .with_fallback(FieldRule::new("span b", 0));
        assert_eq!(rule.method, Method::LastWord);
        assert_eq!(rule.fallbacks.len(), 1);
    }
}
