//! Record assembler: turns resolved field texts into name, genus, author and
//! status tags

use crate::methods;
use crate::policy::AuthorPolicy;
use mob_domain::{Field, Method, RuleSet, StatusVocabulary};
use std::collections::BTreeSet;
use tracing::debug;

/// Text each identity rule resolved to, before any method is applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    /// Name rule text
    pub name: String,
    /// Genus rule text
    pub genus: String,
    /// Author rule text
    pub author: String,
}

/// The identifying part of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Species name, "Unknown" when empty
    pub name: String,
    /// Genus, falling back to the caller's genus, then "Unknown"
    pub genus: String,
    /// Author, if any
    pub author: Option<String>,
    /// Detected status tags
    pub taxonomic_status: BTreeSet<String>,
    /// Genus as scraped, before fallback
    pub scraped_genus_raw: String,
}

/// Assemble the identity fields of a record
///
/// Without an author rule, the author is inferred from the tail of the
/// status-stripped name text and removed from it. When the name rule takes
/// the full text and the book has no genus or author rule either, what is
/// left of a block of several words is split into genus and name.
pub fn resolve_identity(
    rules: &RuleSet,
    raw: &RawFields,
    genus_fallback: &str,
    vocabulary: &StatusVocabulary,
    policy: &dyn AuthorPolicy,
) -> Identity {
    let method_of = |field: Field| {
        rules
            .get(field)
            .map(|rule| rule.method.clone())
            .unwrap_or_default()
    };
    let name_method = method_of(Field::Name);

    let statuses = vocabulary.detect(&format!("{} {}", raw.name, raw.genus));
    let mut genus = methods::apply(&method_of(Field::Genus), &raw.genus, vocabulary);
    let mut author = methods::apply(&method_of(Field::Author), &raw.author, vocabulary);

    let mut working = raw.name.clone();
    if !rules.has(Field::Author) {
        if let Some((inferred, rest)) = infer_from_tail(&raw.name, vocabulary, policy) {
            debug!("Inferred author '{}' from name text '{}'", inferred, raw.name);
            author = inferred;
            working = rest;
        }
    }

    let splittable = rules.has(Field::Name)
        && name_method == Method::FullText
        && !rules.has(Field::Author)
        && !rules.has(Field::Genus)
        && vocabulary.strip(&working).split_whitespace().count() > 1;

    let mut name = methods::apply(&name_method, &working, vocabulary);
    if splittable {
        let (split_genus, split_name) = split_genus_name(&working, vocabulary);
        debug!(
            "Split name block '{}' into genus '{}', name '{}'",
            working, split_genus, split_name
        );
        genus = split_genus;
        name = split_name;
    }

    let author = determine_author(&author, &name, &statuses, vocabulary, policy);
    let scraped_genus_raw = genus.clone();
    let genus = if genus.is_empty() {
        genus_fallback.to_string()
    } else {
        genus
    };

    Identity {
        name: clean_name(&name),
        genus: clean_genus(&genus),
        author: clean_author(author.as_deref()),
        taxonomic_status: statuses,
        scraped_genus_raw,
    }
}

/// Author found at the tail of a name block, and the block without it
///
/// A single remaining word is always the name, never an author.
fn infer_from_tail(
    text: &str,
    vocabulary: &StatusVocabulary,
    policy: &dyn AuthorPolicy,
) -> Option<(String, String)> {
    let stripped = vocabulary.strip(text);
    let mut tokens: Vec<&str> = stripped.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    let (author, range) = policy.infer_author(&tokens)?;
    tokens.drain(range);
    Some((author, tokens.join(" ")))
}

/// First word as genus, the rest as name
fn split_genus_name(text: &str, vocabulary: &StatusVocabulary) -> (String, String) {
    let stripped = vocabulary.strip(text);
    let tokens: Vec<&str> = stripped.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (String::new(), String::new()),
        [only] => (String::new(), only.to_string()),
        [first, rest @ ..] => (first.to_string(), rest.join(" ")),
    }
}

fn determine_author(
    author: &str,
    name: &str,
    statuses: &BTreeSet<String>,
    vocabulary: &StatusVocabulary,
    policy: &dyn AuthorPolicy,
) -> Option<String> {
    let author = vocabulary.strip(author);
    if !author.is_empty() {
        return Some(author);
    }
    policy.default_author(name, statuses)
}

fn clean_name(name: &str) -> String {
    let name = name.replace('\u{fffd}', "");
    let name = name.trim_matches(|c: char| c == '\'' || c == '"' || c == ' ');
    if name.is_empty() {
        "Unknown".to_string()
    } else if name.eq_ignore_ascii_case("sp") {
        "sp.".to_string()
    } else {
        name.to_string()
    }
}

fn clean_genus(genus: &str) -> String {
    let genus = genus.replace('\u{fffd}', "");
    let genus = genus.trim_matches(|c: char| c == '\'' || c == '"' || c == ' ');
    if genus.is_empty() {
        "Unknown".to_string()
    } else {
        genus.to_string()
    }
}

fn clean_author(author: Option<&str>) -> Option<String> {
    let author = author?.replace('\u{fffd}', "");
    let author = author.trim_matches(|c: char| "'\" .,".contains(c));
    if author.is_empty() {
        None
    } else {
        Some(author.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CorpusAuthorPolicy;
    use mob_domain::FieldRule;

    fn name_only() -> RuleSet {
        RuleSet::default().with(Field::Name, FieldRule::new("b", 0))
    }

    fn raw(name: &str) -> RawFields {
        RawFields {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn identity(rules: &RuleSet, raw: &RawFields, fallback: &str) -> Identity {
        resolve_identity(
            rules,
            raw,
            fallback,
            &StatusVocabulary::default(),
            &CorpusAuthorPolicy::default(),
        )
    }

    #[test]
    fn test_split_name_block_with_status() {
        let id = identity(&name_only(), &raw("Genus species Holloway sp. n."), "Fallback");
        assert_eq!(id.name, "species");
        assert_eq!(id.genus, "Genus");
        assert_eq!(id.author.as_deref(), Some("Holloway"));
        assert_eq!(id.taxonomic_status.into_iter().collect::<Vec<_>>(), vec!["sp. n."]);
        assert_eq!(id.scraped_genus_raw, "Genus");
    }

    #[test]
    fn test_split_without_author_gets_authority() {
        let id = identity(&name_only(), &raw("Eupterote sp. 3"), "Fallback");
        assert_eq!(id.genus, "Eupterote");
        assert_eq!(id.name, "sp. 3");
        assert_eq!(id.author.as_deref(), Some("Holloway"));
    }

    #[test]
    fn test_single_token_name_uses_fallback_genus() {
        let id = identity(&name_only(), &raw("albipuncta"), "Cyana");
        assert_eq!(id.name, "albipuncta");
        assert_eq!(id.genus, "Cyana");
        assert_eq!(id.scraped_genus_raw, "");
        assert!(id.author.is_none());
    }

    #[test]
    fn test_no_split_with_author_rule() {
        let rules = name_only()
            .with(Field::Name, FieldRule::new("b", 0).with_method(Method::Position(2)))
            .with(Field::Author, FieldRule::new("i", 0));
        let raw = RawFields {
            name: "Cyana albipuncta".to_string(),
            genus: String::new(),
            author: "(Walker), comb. n.".to_string(),
        };
        let id = identity(&rules, &raw, "Cyana");
        assert_eq!(id.name, "albipuncta");
        assert_eq!(id.author.as_deref(), Some("(Walker)"));
    }

    #[test]
    fn test_author_inferred_with_genus_rule() {
        let rules = name_only().with(Field::Genus, FieldRule::new("i", 0));
        let raw = RawFields {
            name: "albipuncta Holloway".to_string(),
            genus: "Cyana".to_string(),
            author: String::new(),
        };
        let id = identity(&rules, &raw, "Other");
        assert_eq!(id.name, "albipuncta");
        assert_eq!(id.genus, "Cyana");
        assert_eq!(id.author.as_deref(), Some("Holloway"));
    }

    #[test]
    fn test_inferred_author_removed_before_name_method() {
        let rules = name_only()
            .with(Field::Name, FieldRule::new("b", 0).with_method(Method::Position(-1)))
            .with(Field::Genus, FieldRule::new("i", 0));
        let raw = RawFields {
            name: "Cyana albipuncta Holloway & Bender stat. rev.".to_string(),
            genus: "Cyana".to_string(),
            author: String::new(),
        };
        let id = identity(&rules, &raw, "Other");
        assert_eq!(id.name, "albipuncta");
        assert_eq!(id.author.as_deref(), Some("Holloway & Bender"));
        assert!(id.taxonomic_status.contains("stat. rev."));
    }

    #[test]
    fn test_single_titlecase_word_stays_name() {
        let rules = name_only().with(Field::Genus, FieldRule::new("i", 0));
        let id = identity(&rules, &raw("Albipuncta"), "Cyana");
        assert_eq!(id.name, "Albipuncta");
        assert!(id.author.is_none());
    }

    #[test]
    fn test_empty_everything() {
        let id = identity(&RuleSet::default(), &RawFields::default(), "");
        assert_eq!(id.name, "Unknown");
        assert_eq!(id.genus, "Unknown");
        assert!(id.author.is_none());
    }

    #[test]
    fn test_cleanup() {
        let rules = name_only().with(Field::Name, FieldRule::new("b", 0).with_method(Method::FirstWord));
        let id = identity(&rules, &raw("\"sp\" x"), "Cyana");
        assert_eq!(id.name, "sp.");

        let id = identity(&rules, &raw("'nigra\u{fffd}'"), "Cyana");
        assert_eq!(id.name, "nigra");
    }

    #[test]
    fn test_status_from_genus_text() {
        let rules = name_only()
            .with(Field::Name, FieldRule::new("b", 0).with_method(Method::LastWord))
            .with(Field::Genus, FieldRule::new("i", 0).with_method(Method::FirstWord));
        let raw = RawFields {
            name: "Genus nova".to_string(),
            genus: "Novagenus gen. n.".to_string(),
            author: String::new(),
        };
        let id = identity(&rules, &raw, "");
        assert!(id.taxonomic_status.contains("gen. n."));
        assert_eq!(id.genus, "Novagenus");
        assert_eq!(id.name, "nova");
    }
}
