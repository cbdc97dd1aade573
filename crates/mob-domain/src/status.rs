//! Taxonomic status vocabulary

use std::collections::BTreeSet;

/// Status tags observed in the corpus, lowercase
pub const DEFAULT_STATUSES: [&str; 12] = [
    "sp. n.",
    "gen. n.",
    "stat. n.",
    "stat. rev.",
    "comb. n.",
    "comb. rev.",
    "syn. n.",
    "syn. rev.",
    "nom. nov.",
    "stat. nov.",
    "comb. nov.",
    "sp. rev.",
];

/// Closed list of taxonomic status tags
///
/// Tags are matched case-insensitively as substrings, so a tag is found in
/// "Genus species SP. N." as well as in "Genus species sp. n.".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusVocabulary {
    // Lowercase, longest first so stripping removes "comb. rev." before "rev."
    statuses: Vec<String>,
}

impl StatusVocabulary {
    /// Build a vocabulary from arbitrary tags
    pub fn new<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut statuses: Vec<String> = statuses
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        statuses.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        statuses.dedup();
        Self { statuses }
    }

    /// Tags in matching order
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    /// Whether `text` is exactly a tag (ignoring case and surrounding space)
    pub fn contains(&self, text: &str) -> bool {
        let needle = text.trim().to_lowercase();
        self.statuses.iter().any(|s| *s == needle)
    }

    /// Whether a single whitespace token is a tag, with or without its
    /// surrounding punctuation
    pub fn is_status_token(&self, token: &str) -> bool {
        let unwrapped = token.trim_matches(|c: char| "()[],;:\"'".contains(c));
        let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
        [token, unwrapped, stripped]
            .iter()
            .any(|candidate| !candidate.is_empty() && self.contains(candidate))
    }

    /// Every tag occurring in `text`
    pub fn detect(&self, text: &str) -> BTreeSet<String> {
        self.statuses
            .iter()
            .filter(|status| find_ignore_ascii_case(text, status, 0).is_some())
            .cloned()
            .collect()
    }

    /// Remove every occurrence of every tag from `text`
    ///
    /// Repeats until no tag is left, since re-joining the remaining words can
    /// bring the halves of a tag back together ("sp. sp. n. n.").
    pub fn strip(&self, text: &str) -> String {
        let mut out = text.split_whitespace().collect::<Vec<_>>().join(" ");
        loop {
            let mut removed = false;
            for status in &self.statuses {
                let mut from = 0;
                while let Some(start) = find_ignore_ascii_case(&out, status, from) {
                    out.replace_range(start..start + status.len(), " ");
                    from = start + 1;
                    removed = true;
                }
            }
            out = out.split_whitespace().collect::<Vec<_>>().join(" ");
            if !removed {
                return out;
            }
        }
    }
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_STATUSES)
    }
}

/// Byte offset of `needle` in `haystack[from..]`, ASCII case-insensitive
///
/// Tags are ASCII, so a matching window always starts on a char boundary.
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    if pat.is_empty() || hay.len() < pat.len() || from > hay.len() - pat.len() {
        return None;
    }
    (from..=hay.len() - pat.len()).find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
}
