//! Author policies
//!
//! Corpus-specific heuristics for finding and defaulting the taxonomic author.
//! They are kept behind a trait so another corpus can swap them out.

use crate::methods::{is_titlecase, is_uppercase, strip_punctuation};
use std::collections::BTreeSet;
use std::ops::Range;

/// Status tags that mark a name as newly described
pub const NEW_NAME_STATUSES: [&str; 2] = ["sp. n.", "nom. nov."];

/// Heuristics for the author of a name
pub trait AuthorPolicy {
    /// Find the author inside the tokens of a combined name block
    ///
    /// Returns the author and the token range it occupies.
    fn infer_author(&self, tokens: &[&str]) -> Option<(String, Range<usize>)>;

    /// Author to assume when none was found
    fn default_author(&self, name: &str, statuses: &BTreeSet<String>) -> Option<String>;
}

/// Heuristics observed in the Moths of Borneo pages
///
/// - the author is the trailing capitalized token, or a `Title & Title` pair
/// - unattributed new species and numbered `sp.` names belong to the fixed
///   authority
#[derive(Debug, Clone)]
pub struct CorpusAuthorPolicy {
    authority: String,
}

impl CorpusAuthorPolicy {
    /// Policy assigning unattributed new names to `authority`
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
        }
    }
}

impl Default for CorpusAuthorPolicy {
    fn default() -> Self {
        Self::new("Holloway")
    }
}

impl AuthorPolicy for CorpusAuthorPolicy {
    fn infer_author(&self, tokens: &[&str]) -> Option<(String, Range<usize>)> {
        if let Some(amp) = tokens.iter().position(|t| *t == "&") {
            if amp > 0 && amp + 1 < tokens.len() {
                let (first, second) = (tokens[amp - 1], tokens[amp + 1]);
                if is_titlecase(first) && is_titlecase(second) {
                    return Some((format!("{} & {}", first, second), amp - 1..amp + 2));
                }
            }
        }

        let last = tokens.len().checked_sub(1)?;
        let word = strip_punctuation(tokens[last]);
        if word.chars().count() > 1 && (is_titlecase(word) || is_uppercase(word)) {
            return Some((word.to_string(), last..tokens.len()));
        }
        None
    }

    fn default_author(&self, name: &str, statuses: &BTreeSet<String>) -> Option<String> {
        let is_new = NEW_NAME_STATUSES.iter().any(|s| statuses.contains(*s));
        let is_numbered_sp = name == "sp."
            || name
                .strip_prefix("sp. ")
                .and_then(|rest| rest.split(' ').last())
                .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));

        if is_new || is_numbered_sp {
            Some(self.authority.clone())
        } else {
            None
        }
    }
}
