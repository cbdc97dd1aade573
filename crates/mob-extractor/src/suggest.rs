//! Selector suggestions for the refinement loop
//!
//! Heuristics over tag shape and text length propose `(selector, index)`
//! candidates for every field. Candidates keep document order, which is the
//! order they are offered to the operator in.

use crate::methods::{is_lowercase, is_numeric, is_titlecase, strip_punctuation};
use crate::query::{element_text, Document};
use mob_domain::{Field, FieldRule, Method};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use std::collections::{BTreeMap, HashSet};

static CITATION_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

const PARAGRAPH_SELECTORS: [&str; 3] = ["p[align=\"justify\"]", "p[style*=\"text-align:justify\"]", "p"];
const PREVIEW_LENGTH: usize = 150;

/// A candidate rule and the text it currently resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Candidate rule
    pub rule: FieldRule,
    /// What the rule resolves to now
    pub text: String,
}

/// Candidate rules per field
pub fn suggest_selectors(document: &Document) -> BTreeMap<Field, Vec<Suggestion>> {
    let mut suggestions: BTreeMap<Field, Vec<Suggestion>> =
        Field::ALL.into_iter().map(|field| (field, Vec::new())).collect();
    let mut push = |field: Field, rule: &FieldRule, text: &str| {
        if let Some(list) = suggestions.get_mut(&field) {
            list.push(Suggestion {
                rule: rule.clone(),
                text: text.to_string(),
            });
        }
    };

    for (i, tag) in document.select_lenient("b").into_iter().enumerate() {
        let text = spaced_text(tag).replace("? ", "?");
        let rule = FieldRule::new("b", i as i64);
        if is_label_sized(&text) {
            push(Field::Name, &rule, &text);
            push(Field::Genus, &rule, &text);
            if looks_like_author(&text) {
                push(Field::Author, &rule, &text);
            }
        }
    }

    for (i, tag) in document.select_lenient("span").into_iter().enumerate() {
        let text = spaced_text(tag);
        let has_bold = tag.descendants().skip(1).any(|node| {
            ElementRef::wrap(node).is_some_and(|el| el.value().name() == "b")
        });
        if (has_bold || text.chars().count() < 30) && is_label_sized(&text) {
            let rule = FieldRule::new("span", i as i64);
            push(Field::Name, &rule, &text);
            push(Field::Genus, &rule, &text);
            if looks_like_author(&text) {
                push(Field::Author, &rule, &text);
            }
        }
    }

    let mut seen = HashSet::new();
    for selector in PARAGRAPH_SELECTORS {
        for (i, tag) in document.select_lenient(selector).into_iter().enumerate() {
            if !seen.insert(tag.id()) {
                continue;
            }
            let text = element_text(tag);
            let length = text.chars().count();
            let rule = FieldRule::new(selector, i as i64);
            if length > PREVIEW_LENGTH {
                let preview: String = text.chars().take(PREVIEW_LENGTH).collect();
                push(Field::Content, &rule, &format!("{}...", preview));
            }
            if length < 200 && CITATION_YEAR.is_match(&text) {
                push(Field::Citation, &rule, &text);
            }
        }
    }

    suggestions
}

/// Method that picks `target` out of `text`
///
/// `None` when the word does not occur in the text or has no recognizable
/// shape.
pub fn infer_method(text: &str, target: &str) -> Option<Method> {
    let target = target.trim();
    if target.is_empty() {
        return None;
    }
    let found = text
        .split_whitespace()
        .any(|token| token == target || strip_punctuation(token) == target);
    if !found {
        return None;
    }

    if is_lowercase(target) || is_numeric(target) {
        Some(Method::FirstLowercase)
    } else if is_titlecase(target) {
        Some(Method::FirstTitlecase)
    } else {
        None
    }
}

/// Text nodes trimmed and joined by single spaces
fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_label_sized(text: &str) -> bool {
    (2..100).contains(&text.chars().count())
}

fn looks_like_author(text: &str) -> bool {
    is_titlecase(text) || (text.starts_with('(') && text.ends_with(')'))
}
