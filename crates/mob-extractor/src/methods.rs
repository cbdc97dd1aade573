//! Method dispatcher: applies a [`Method`] to resolved text

use mob_domain::{Method, StatusVocabulary};

/// Apply `method` to whitespace-normalized `text`
///
/// Token-based methods return an empty string when no token qualifies.
pub fn apply(method: &Method, text: &str, vocabulary: &StatusVocabulary) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return String::new();
    }

    match method {
        Method::FullText | Method::Unknown(_) | Method::BuildCitationString => {
            tokens.join(" ")
        }
        Method::Position(pos) => position(&tokens, *pos).unwrap_or_default().to_string(),
        Method::FirstWord => tokens[0].to_string(),
        Method::FirstLowercase => tokens
            .iter()
            .map(|t| strip_punctuation(t))
            .find(|t| is_lowercase(t) || is_numeric(t))
            .unwrap_or_default()
            .to_string(),
        Method::FirstTitlecase => tokens
            .iter()
            .map(|t| strip_punctuation(t))
            .find(|t| is_titlecase(t))
            .unwrap_or_default()
            .to_string(),
        Method::LastWord => last_word(text, vocabulary),
    }
}

/// Token at a 1-based position, negative from the end
fn position<'a>(tokens: &[&'a str], pos: i64) -> Option<&'a str> {
    let len = tokens.len() as i64;
    let index = match pos {
        0 => return None,
        p if p > 0 => p - 1,
        p => len.checked_add(p)?,
    };
    if (0..len).contains(&index) {
        Some(tokens[index as usize])
    } else {
        None
    }
}

fn last_word(text: &str, vocabulary: &StatusVocabulary) -> String {
    let stripped = vocabulary.strip(text);
    stripped
        .split_whitespace()
        .rev()
        .filter(|token| !vocabulary.is_status_token(token))
        .map(strip_punctuation)
        .find(|token| !token.is_empty() && !vocabulary.contains(token))
        .unwrap_or_default()
        .to_string()
}

/// Trim ASCII punctuation from both ends
pub(crate) fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_ascii_punctuation())
}

/// At least one cased character and no uppercase ones
pub(crate) fn is_lowercase(s: &str) -> bool {
    s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
}

/// At least one cased character and no lowercase ones
pub(crate) fn is_uppercase(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

pub(crate) fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Every cased run starts with exactly one uppercase letter
///
/// "Holloway" and "Moore-Smith" qualify; "McDonald", "HOLLOWAY" and "de" do not.
pub(crate) fn is_titlecase(s: &str) -> bool {
    let mut seen_cased = false;
    let mut previous_cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else {
            previous_cased = false;
        }
    }
    seen_cased
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(method: Method, text: &str) -> String {
        apply(&method, text, &StatusVocabulary::default())
    }

    #[test]
    fn test_position() {
        assert_eq!(run(Method::Position(1), "Cyana albipuncta Holloway"), "Cyana");
        assert_eq!(run(Method::Position(2), "Cyana albipuncta Holloway"), "albipuncta");
        assert_eq!(run(Method::Position(-1), "Cyana albipuncta Holloway"), "Holloway");
        assert_eq!(run(Method::Position(4), "Cyana albipuncta Holloway"), "");
        assert_eq!(run(Method::Position(-4), "Cyana albipuncta Holloway"), "");
        assert_eq!(run(Method::Position(0), "Cyana albipuncta"), "");
        assert_eq!(run(Method::parse("position_99999999999"), "a b c"), "");
        assert_eq!(run(Method::parse("position_-99999999999999999999999"), "a b c"), "");
    }

    #[test]
    fn test_first_word() {
        assert_eq!(run(Method::FirstWord, "  Cyana   albipuncta "), "Cyana");
        assert_eq!(run(Method::FirstWord, "   "), "");
    }

    #[test]
    fn test_first_lowercase() {
        assert_eq!(run(Method::FirstLowercase, "Cyana (albipuncta) Holloway"), "albipuncta");
        assert_eq!(run(Method::FirstLowercase, "Eupterote sp. 3"), "sp");
        assert_eq!(run(Method::FirstLowercase, "Eupterote 3"), "3");
        assert_eq!(run(Method::FirstLowercase, "Eupterote Holloway"), "");
    }

    #[test]
    fn test_first_titlecase() {
        assert_eq!(run(Method::FirstTitlecase, "albipuncta Holloway, 1976"), "Holloway");
        assert_eq!(run(Method::FirstTitlecase, "albipuncta HOLLOWAY"), "");
    }

    #[test]
    fn test_last_word_skips_statuses() {
        assert_eq!(run(Method::LastWord, "Genus species sp. n."), "species");
        assert_eq!(run(Method::LastWord, "Genus species Holloway, stat. rev."), "Holloway");
        assert_eq!(run(Method::LastWord, "sp. n."), "");
    }

    #[test]
    fn test_full_text_and_unknown_are_identity() {
        assert_eq!(run(Method::FullText, "a  b"), "a b");
        assert_eq!(run(Method::Unknown("mystery".into()), "a b"), "a b");
    }

    #[test]
    fn test_titlecase() {
        assert!(is_titlecase("Holloway"));
        assert!(is_titlecase("Moore-Smith"));
        assert!(!is_titlecase("McDonald"));
        assert!(!is_titlecase("HOLLOWAY"));
        assert!(!is_titlecase("1976"));
        assert!(is_uppercase("WALKER"));
        assert!(is_lowercase("sp."));
    }

    proptest! {
        /// Property: positive positions index from the front, negative from the back
        #[test]
        fn test_position_indexing(words in prop::collection::vec("[a-zA-Z]{1,6}", 1..8), n in -10i64..10) {
            let text = words.join(" ");
            let result = run(Method::Position(n), &text);
            let len = words.len() as i64;
            let expected = if n > 0 && n <= len {
                words[(n - 1) as usize].clone()
            } else if n < 0 && -n <= len {
                words[(len + n) as usize].clone()
            } else {
                String::new()
            };
            prop_assert_eq!(result, expected);
        }

        /// Property: last_word never yields a status tag while a plain word exists
        #[test]
        fn test_last_word_never_status(
            words in prop::collection::vec("[a-zA-Z]{2,8}|sp\\. n\\.|SP\\. N\\.|stat\\. rev\\.|comb\\. n\\.", 1..8)
        ) {
            let vocabulary = StatusVocabulary::default();
            let text = words.join(" ");
            let result = apply(&Method::LastWord, &text, &vocabulary);
            let has_plain = words.iter().any(|w| !w.contains('.'));
            if has_plain {
                prop_assert!(!result.is_empty());
                prop_assert!(!vocabulary.contains(&result));
                prop_assert!(!vocabulary.is_status_token(&result));
            }
        }
    }
}
