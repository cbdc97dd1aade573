//! Versioned rule registry

use crate::RegistryError;
use mob_domain::traits::RuleStore;
use mob_domain::{RuleSet, DEFAULT_BOOK};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Immutable snapshot of every book's rule set
///
/// A registry is never edited in place: [`RuleRegistry::commit`] returns a
/// new snapshot with a bumped version and leaves the receiver untouched, so a
/// caller holding an older snapshot keeps seeing a consistent rule set until
/// it re-fetches.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    sets: BTreeMap<String, Arc<RuleSet>>,
    version: u64,
}

impl RuleRegistry {
    /// Build a registry from rule sets keyed by book
    pub fn new(sets: BTreeMap<String, RuleSet>) -> Self {
        Self {
            sets: sets.into_iter().map(|(k, v)| (k, Arc::new(v))).collect(),
            version: 0,
        }
    }

    /// Parse a registry from a rules TOML document
    pub fn from_toml(toml_str: &str) -> Result<Self, RegistryError> {
        let sets: BTreeMap<String, RuleSet> = toml::from_str(toml_str)?;
        Ok(Self::new(sets))
    }

    /// Serialize every rule set to TOML, books in sorted order
    pub fn to_toml(&self) -> Result<String, RegistryError> {
        Ok(toml::to_string_pretty(&self.snapshot())?)
    }

    /// Load a registry from a store
    pub fn load<S>(store: &S) -> Result<Self, RegistryError>
    where
        S: RuleStore<Error = RegistryError>,
    {
        let sets = store.load_rules()?;
        info!("Loaded rule sets for {} book(s)", sets.len());
        Ok(Self::new(sets))
    }

    /// Write every rule set to a store
    pub fn persist<S>(&self, store: &S) -> Result<(), RegistryError>
    where
        S: RuleStore<Error = RegistryError>,
    {
        store.save_rules(&self.snapshot())
    }

    /// Active rule set for a book, falling back to `default`
    pub fn rules_for(&self, book: &str) -> Result<&RuleSet, RegistryError> {
        if let Some(rules) = self.sets.get(book) {
            return Ok(rules.as_ref());
        }
        match self.sets.get(DEFAULT_BOOK) {
            Some(rules) => {
                debug!("No rules for book '{}', using default", book);
                Ok(rules.as_ref())
            }
            None => Err(RegistryError::NoRuleSet {
                book: book.to_string(),
            }),
        }
    }

    /// Rule set defined for exactly this book, without fallback
    pub fn book_rules(&self, book: &str) -> Option<&RuleSet> {
        self.sets.get(book).map(Arc::as_ref)
    }

    /// Replace a book's rule set, returning the new snapshot
    pub fn commit(&self, book: &str, rules: RuleSet) -> RuleRegistry {
        let mut sets = self.sets.clone();
        sets.insert(book.to_string(), Arc::new(rules));
        let next = RuleRegistry {
            sets,
            version: self.version + 1,
        };
        info!("Committed rules for book '{}' (registry v{})", book, next.version);
        next
    }

    /// Number of commits since load
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Books with a rule set, sorted
    pub fn books(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    fn snapshot(&self) -> BTreeMap<String, RuleSet> {
        self.sets
            .iter()
            .map(|(k, v)| (k.clone(), RuleSet::clone(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mob_domain::{Field, FieldRule, Method};

    fn sample() -> RuleRegistry {
        let mut sets = BTreeMap::new();
        sets.insert(
            DEFAULT_BOOK.to_string(),
            RuleSet::default().with(Field::Name, FieldRule::new("b", 0)),
        );
        sets.insert(
            "three".to_string(),
            RuleSet::default().with(
                Field::Name,
                FieldRule::new("span b", 1).with_method(Method::LastWord),
            ),
        );
        RuleRegistry::new(sets)
    }

    #[test]
    fn test_book_specific_rules() {
        let registry = sample();
        let rules = registry.rules_for("three").unwrap();
        assert_eq!(rules.get(Field::Name).unwrap().selector, "span b");
    }

    #[test]
    fn test_default_fallback() {
        let registry = sample();
        let rules = registry.rules_for("eleven").unwrap();
        assert_eq!(rules.get(Field::Name).unwrap().selector, "b");
        assert!(registry.book_rules("eleven").is_none());
    }

    #[test]
    fn test_missing_default_is_an_error() {
        let registry = RuleRegistry::default();
        let err = registry.rules_for("three").unwrap_err();
        assert!(matches!(err, RegistryError::NoRuleSet { ref book } if book == "three"));
    }

    #[test]
    fn test_commit_returns_new_snapshot() {
        let registry = sample();
        let updated = registry.commit(
            "eleven",
            RuleSet::default().with(Field::Name, FieldRule::new("h2", 0)),
        );

        assert_eq!(registry.version(), 0);
        assert_eq!(updated.version(), 1);
        assert!(registry.book_rules("eleven").is_none());
        assert_eq!(
            updated.rules_for("eleven").unwrap().get(Field::Name).unwrap().selector,
            "h2"
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let registry = sample();
        let toml_str = registry.to_toml().unwrap();
        let parsed = RuleRegistry::from_toml(&toml_str).unwrap();
        assert_eq!(
            parsed.rules_for("three").unwrap(),
            registry.rules_for("three").unwrap()
        );
        assert_eq!(parsed.books().collect::<Vec<_>>(), vec!["default", "three"]);
    }
}
