//! Citation parsing and formatting
//!
//! A citation line such as
//! `Cyana albipuncta Holloway, 1976, Moths of Borneo, 7: 45` is broken into
//! synonym, year, publication, page reference and comment. Several citations
//! separated by `;` share the synonym of the first one.
//!
//! Formatting writes the synonym's first two words and the publication in
//! emphasis and the comment in strong emphasis. The parser reads that
//! emphasis back as structure, so formatting a parsed citation and parsing
//! it again is stable.

use crate::markdown::{convert, MarkdownOptions};
use mob_domain::citation::is_available;
use mob_domain::{ParsedCitation, NOT_AVAILABLE};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{ElementRef, Selector};
use tracing::debug;

/// Year forms: `[1892] 1893`, `1931-1932`, `1931-32`, `1931 (nec 1930)`, `1931`
const YEAR: &str =
    r"\[\d{4}\]\s*\d{4}(?:-\d{1,2})?|\d{4}-\d{4}|\d{4}-\d{1,2}|\d{4}\s*\(nec\s\d{4}\)|\d{4}";

static HAS_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("(?:{})", YEAR)).unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static COMMA_PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\.").unwrap());
static WORD_BEFORE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z]+)\s+(\d{4})").unwrap());
static COMMA_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").unwrap());
static BOLD_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static TRAILING_REMARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^()\d]*)\)\s*$").unwrap());
static EMPHASIZED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:\*(?P<syn_em>[^*]+)\*(?P<syn_rest>[^*]*?), )?(?P<year>{})(?:,?\s\*(?P<pub>[^*]+)\*)?(?:,?\s(?P<tail>[^*]+?))?$",
        YEAR
    ))
    .unwrap()
});
static SHORT_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?),\s*(\d{4}):\s*(.*)$").unwrap());
static PAGE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:(?:\d+|[IVX]+)\s?:\s?)?\d[\d\s,\-]*\.?)$").unwrap()
});

/// Pattern tag of a citation in `Synonym, YYYY: pages` form
pub const SHORT_FORM_PATTERN: &str = "[SHORT_FORM]";

/// Citation parser with its exclusion phrases
#[derive(Debug, Clone)]
pub struct CitationParser {
    exclusion_phrases: Vec<String>,
}

impl Default for CitationParser {
    fn default() -> Self {
        Self::new(["habitat preference"])
    }
}

impl CitationParser {
    /// Parser rejecting text that contains any of `exclusion_phrases`
    pub fn new<I, S>(exclusion_phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            exclusion_phrases: exclusion_phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Parse one citation line into one or more citations
    ///
    /// Never fails: text without a year, or containing an exclusion phrase,
    /// yields a single citation tagged `[INVALID CITATION]`.
    pub fn parse(&self, text: &str, source: &str) -> Vec<ParsedCitation> {
        if !HAS_YEAR.is_match(text) || self.is_excluded(text) {
            debug!("Rejected citation text '{}'", text);
            return vec![ParsedCitation::invalid(text, source)];
        }

        let segments: Vec<&str> = text
            .split(';')
            .map(str::trim)
            .filter(|s| !s.trim_matches(|c: char| " ,.;:*".contains(c)).is_empty())
            .collect();

        let parsed = match segments.as_slice() {
            [] => Vec::new(),
            [single] => parse_segment(single, None, source).into_iter().collect(),
            [first, rest @ ..] => {
                let (mut shared, segments) = if HAS_YEAR.is_match(first) {
                    (None, segments.as_slice())
                } else {
                    let synonym = normalize(&first.replace('*', ""));
                    let synonym = synonym.trim_matches(|c: char| " ,.".contains(c));
                    (available(synonym), rest)
                };
                let inherit_from_first = shared.is_none();

                let mut parsed = Vec::new();
                for segment in segments {
                    if let Some(citation) = parse_segment(segment, shared.as_deref(), source) {
                        if parsed.is_empty() && inherit_from_first {
                            shared = available(&citation.synonym);
                        }
                        parsed.push(citation);
                    }
                }
                parsed
            }
        };

        if parsed.is_empty() {
            debug!("No citation recognized in '{}'", text);
            vec![ParsedCitation::invalid(text, source)]
        } else {
            parsed
        }
    }

    fn is_excluded(&self, text: &str) -> bool {
        let lowered = text
            .replace('*', "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        self.exclusion_phrases.iter().any(|p| lowered.contains(p))
    }
}

/// Parse with the default exclusion phrases
pub fn parse_citation(text: &str, source: &str) -> Vec<ParsedCitation> {
    CitationParser::default().parse(text, source)
}

/// Render one citation; rejected citations render as `N/A`
pub fn format_citation(citation: &ParsedCitation) -> String {
    if citation.is_invalid() {
        return NOT_AVAILABLE.to_string();
    }

    let synonym = if is_available(&citation.synonym) {
        let words: Vec<&str> = citation.synonym.split_whitespace().collect();
        let head = words.iter().take(2).copied().collect::<Vec<_>>().join(" ");
        let tail = words.iter().skip(2).copied().collect::<Vec<_>>().join(" ");
        format!("*{}* {}", head, tail).trim().to_string()
    } else {
        String::new()
    };
    let publication = if is_available(&citation.publication) {
        format!("*{}*", citation.publication)
    } else {
        String::new()
    };
    let comment = if is_available(&citation.comment) {
        format!("**{}**", citation.comment)
    } else {
        String::new()
    };

    let parts = [
        synonym.as_str(),
        citation.year.as_str(),
        publication.as_str(),
        citation.page_reference.as_str(),
        comment.as_str(),
    ];
    parts
        .iter()
        .filter(|part| is_available(part))
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
        .replace('\n', " ")
        .replace('\r', "")
}

/// Render several citations joined by `"; "`
pub fn format_citations(citations: &[ParsedCitation]) -> String {
    citations
        .iter()
        .map(format_citation)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Build a citation string from a citation container element
///
/// The first bold element (the name label) is dropped, the rest converted
/// to Markdown and parsed. Text the parser rejects is returned cleaned but
/// otherwise verbatim.
pub fn scrape_citation(container: ElementRef<'_>, parser: &CitationParser, source: &str) -> String {
    let first_bold = Selector::parse("b")
        .ok()
        .and_then(|selector| container.select(&selector).next());
    let options = MarkdownOptions {
        strip: &["a", "p"],
        skip: first_bold,
    };
    let clean = convert(container, &options)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if clean.is_empty() {
        return clean;
    }

    let parsed = parser.parse(&clean, source);
    if parsed.first().map_or(true, ParsedCitation::is_invalid) {
        clean
    } else {
        format_citations(&parsed)
    }
}

fn available(value: &str) -> Option<String> {
    if is_available(value) {
        Some(value.to_string())
    } else {
        None
    }
}

fn or_not_available(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

/// Whitespace and comma normalization shared by every path
fn normalize(text: &str) -> String {
    let text = WHITESPACE.replace_all(text.trim(), " ");
    let text = COMMA_PERIOD.replace_all(&text, ", ");
    let text = WORD_BEFORE_YEAR.replace_all(&text, |caps: &Captures| {
        if caps[1].eq_ignore_ascii_case("nec") {
            caps[0].to_string()
        } else {
            format!("{}, {}", &caps[1], &caps[2])
        }
    });
    COMMA_SPACING.replace_all(&text, ", ").trim().to_string()
}

/// Split a trailing page reference off `text`: `(publication, page)`
fn split_page_reference(text: &str) -> (String, String) {
    let text = text.trim();
    let trim_publication = |s: &str| s.trim_matches(|c: char| " ,.:;".contains(c)).to_string();
    match PAGE_REFERENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(page) => {
            let reference = page.as_str().trim_matches(|c: char| " ,.".contains(c));
            (trim_publication(&text[..page.start()]), or_not_available(reference))
        }
        None => (trim_publication(text), NOT_AVAILABLE.to_string()),
    }
}

/// Parse a single `;`-free segment
///
/// With a shared synonym the segment's own synonym is replaced; if it differs
/// and no publication was found, it is taken as the publication.
fn parse_segment(segment: &str, shared: Option<&str>, source: &str) -> Option<ParsedCitation> {
    let mut text = normalize(segment);
    let mut citation = ParsedCitation::empty(segment, source);

    let remark = BOLD_COMMENT
        .captures(&text)
        .or_else(|| TRAILING_REMARK.captures(&text))
        .and_then(|caps| Some((caps[1].trim().to_string(), caps.get(0)?.range())));
    if let Some((comment, range)) = remark {
        text.replace_range(range, "");
        if !comment.is_empty() {
            citation.comment = comment;
        }
    }
    let text = normalize(&text);
    let text = text.trim_matches(|c: char| c == ' ' || c == ',');

    if let Some(caps) = EMPHASIZED.captures(text) {
        let synonym = format!(
            "{}{}",
            caps.name("syn_em").map_or("", |m| m.as_str()),
            caps.name("syn_rest").map_or("", |m| m.as_str())
        );
        let (tail_publication, page) =
            split_page_reference(caps.name("tail").map_or("", |m| m.as_str()));
        let publication = [caps.name("pub").map_or("", |m| m.as_str()).trim(), tail_publication.as_str()]
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ");

        citation.synonym = or_not_available(synonym.trim_matches(|c: char| " ,.".contains(c)));
        citation.year = caps["year"].to_string();
        citation.publication =
            or_not_available(publication.trim_matches(|c: char| " ,.:;".contains(c)));
        citation.page_reference = page;
        inherit(&mut citation, shared);
        citation.pattern = pattern_of(&citation);
        return Some(citation);
    }

    let plain = text.replace('*', "");
    let plain = normalize(&plain);

    if shared.is_none() {
        if let Some(caps) = SHORT_FORM.captures(&plain) {
            let synonym = caps[1].trim_matches(|c: char| " ,.".contains(c));
            let short = plain.split(',').count() < 3 || plain.to_lowercase().contains("sensu");
            if short && !HAS_YEAR.is_match(synonym) {
                let (publication, page) = split_page_reference(&caps[3]);
                citation.synonym = or_not_available(synonym);
                citation.year = caps[2].to_string();
                citation.page_reference = page;
                citation.publication = if publication.is_empty() {
                    infer_publication(synonym)
                } else {
                    publication
                };
                citation.pattern = SHORT_FORM_PATTERN.to_string();
                return Some(citation);
            }
        }
    }

    let year = YEAR_TOKEN.find(&plain)?;
    let synonym = plain[..year.start()].trim_matches(|c: char| " ,.:".contains(c));
    let remainder = plain[year.end()..].trim_matches(|c: char| " ,.:".contains(c));
    let (publication, page) = split_page_reference(remainder);

    citation.synonym = or_not_available(synonym);
    citation.year = year.as_str().to_string();
    citation.publication = or_not_available(&publication);
    citation.page_reference = page;
    inherit(&mut citation, shared);
    citation.pattern = pattern_of(&citation);
    Some(citation)
}

fn inherit(citation: &mut ParsedCitation, shared: Option<&str>) {
    let Some(shared) = shared else {
        return;
    };
    let own = std::mem::replace(&mut citation.synonym, shared.to_string());
    if is_available(&own) && own != shared && !is_available(&citation.publication) {
        citation.publication = own;
    }
}

/// Publication implied by a short-form synonym
///
/// The trailing capitalized word ("... Moore"), or the word after "sensu".
fn infer_publication(synonym: &str) -> String {
    let last = synonym
        .split_whitespace()
        .last()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
        .unwrap_or("");
    if !last.eq_ignore_ascii_case("sensu") && last.starts_with(char::is_uppercase) {
        return last.to_string();
    }

    let lowered = synonym.to_ascii_lowercase();
    if let Some(pos) = lowered.find("sensu ") {
        let after = synonym[pos + "sensu ".len()..].trim();
        let mut chars = after.chars();
        if let Some(first) = chars.next() {
            let capitalized: String = first
                .to_uppercase()
                .chain(chars.as_str().to_lowercase().chars())
                .collect();
            return capitalized.trim_matches(|c: char| " ,.:;".contains(c)).to_string();
        }
    }
    NOT_AVAILABLE.to_string()
}

fn pattern_of(citation: &ParsedCitation) -> String {
    let parts = [
        (&citation.synonym, "[SYNONYM]"),
        (&citation.year, "[YEAR]"),
        (&citation.publication, "[PUBLICATION]"),
        (&citation.page_reference, "[PAGEREF]"),
        (&citation.comment, "[COMMENT]"),
    ];
    parts
        .iter()
        .filter(|(value, _)| is_available(value))
        .map(|(_, tag)| *tag)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mob_domain::INVALID_PATTERN;
    use proptest::prelude::*;

    fn round(text: &str) -> String {
        format_citations(&parse_citation(text, "test"))
    }

    #[test]
    fn test_shared_synonym() {
        let parsed = parse_citation("Synonym genus, 1931: 45-50; Author, 1999", "doc");
        assert_eq!(parsed.len(), 2);

        assert_eq!(parsed[0].synonym, "Synonym genus");
        assert_eq!(parsed[0].year, "1931");
        assert_eq!(parsed[0].page_reference, "45-50");
        assert_eq!(parsed[0].pattern, SHORT_FORM_PATTERN);

        assert_eq!(parsed[1].synonym, "Synonym genus");
        assert_eq!(parsed[1].year, "1999");
        assert_eq!(parsed[1].publication, "Author");
        assert_eq!(parsed[1].source, "doc");
    }

    #[test]
    fn test_no_year_is_invalid() {
        let parsed = parse_citation("Cyana albipuncta Holloway", "doc");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].pattern, INVALID_PATTERN);
        assert_eq!(format_citation(&parsed[0]), "N/A");
    }

    #[test]
    fn test_exclusion_phrase_is_invalid() {
        let parsed = parse_citation("*Habitat  preference.* Lowland forest, 1982 survey", "doc");
        assert!(parsed[0].is_invalid());

        let custom = CitationParser::new(["lowland"]);
        assert!(custom.parse("Lowland forest 1982", "doc")[0].is_invalid());
    }

    #[test]
    fn test_general_form() {
        let parsed = parse_citation(
            "Cyana albipuncta Holloway 1976, Moths of Borneo, 7: 45, 47.",
            "doc",
        );
        let c = &parsed[0];
        assert_eq!(c.synonym, "Cyana albipuncta Holloway");
        assert_eq!(c.year, "1976");
        assert_eq!(c.publication, "Moths of Borneo");
        assert_eq!(c.page_reference, "7: 45, 47");
        assert_eq!(
            format_citation(c),
            "*Cyana albipuncta* Holloway, 1976, *Moths of Borneo*, 7: 45, 47"
        );
    }

    #[test]
    fn test_year_forms() {
        assert_eq!(parse_citation("Genus species Walker, [1865] 1866, List", "d")[0].year, "[1865] 1866");
        assert_eq!(parse_citation("Genus species Walker, 1931-32, List", "d")[0].year, "1931-32");
        assert_eq!(
            parse_citation("Genus species Walker, 1931 (nec 1930), List", "d")[0].year,
            "1931 (nec 1930)"
        );
    }

    #[test]
    fn test_short_form_publication_inference() {
        let parsed = parse_citation("Genus species Moore, 1882: 12", "d");
        assert_eq!(parsed[0].publication, "Moore");
        assert_eq!(parsed[0].page_reference, "12");

        let parsed = parse_citation("Genus species sensu auct., 1931: 9", "d");
        assert_eq!(parsed[0].publication, "Auct");
    }

    #[test]
    fn test_comments() {
        let parsed = parse_citation("Genus species Walker, 1865, List, 3: 12 (misidentification)", "d");
        assert_eq!(parsed[0].comment, "misidentification");
        assert_eq!(parsed[0].page_reference, "3: 12");

        let parsed = parse_citation("Genus species Walker, 1865, **syn. n.**", "d");
        assert_eq!(parsed[0].comment, "syn. n.");
        assert_eq!(
            format_citation(&parsed[0]),
            "*Genus species* Walker, 1865, **syn. n.**"
        );
    }

    #[test]
    fn test_emphasis_read_as_structure() {
        let parsed = parse_citation("*Cyana albipuncta* Holloway, 1976, *Moths of Borneo*, 7: 45", "d");
        let c = &parsed[0];
        assert_eq!(c.synonym, "Cyana albipuncta Holloway");
        assert_eq!(c.publication, "Moths of Borneo");
        assert_eq!(c.page_reference, "7: 45");
    }

    #[test]
    fn test_first_segment_without_year_is_shared() {
        let parsed = parse_citation("Cyana albipuncta; Walker, 1865, List, 3: 12; Moore, 1882", "d");
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|c| c.synonym == "Cyana albipuncta"));
        assert_eq!(parsed[0].publication, "List");
        assert_eq!(parsed[1].publication, "Moore");
    }

    #[test]
    fn test_format_drops_missing_parts() {
        let mut citation = ParsedCitation::empty("x", "d");
        citation.year = "1999".to_string();
        assert_eq!(format_citation(&citation), "1999");
    }

    #[test]
    fn test_curated_idempotence() {
        for text in [
            "Synonym genus, 1931: 45-50; Author, 1999",
            "Cyana albipuncta Holloway 1976, Moths of Borneo, 7: 45, 47.",
            "Genus species sensu Moore, 1931: 12",
            "Genus species Walker, [1865] 1866, List Specimens lepid. Insects Colln Br. Mus., 3: 12 (misidentification)",
            "1931: 45-50",
            "Cyana; Walker, 1865; Moore, 1882, Lep. Atk., 1888: 3",
            "Genus species Walker, 1865, **syn. n.**; 1870, Proc., IV: 3",
            "no year here",
            "*Genus* *species* Walker 1865",
        ] {
            let once = round(text);
            assert_eq!(round(&once), once, "not stable for {:?}", text);
        }
    }

    fn citation_text() -> impl Strategy<Value = String> {
        let synonym = prop::collection::vec("[A-Z][a-z]{2,8}|[a-z]{3,9}|sensu|&", 0..4);
        let year = prop_oneof![
            "(18|19|20)[0-9]{2}",
            "\\[18[0-9]{2}\\] 18[0-9]{2}",
            "19[0-9]{2}-[0-9]{2}",
            "19[0-9]{2} \\(nec 19[0-9]{2}\\)",
        ];
        let publication = prop::collection::vec("[A-Z][a-z]{1,6}\\.?|[a-z]{2,6}", 0..4);
        let page = prop::option::of("([0-9]{1,3}|[IVX]{1,3}): ?[0-9]{1,3}(-[0-9]{1,3})?");
        let comment = prop::option::of("[a-z]{3,10}( [a-z]{2,6})?");
        let separator = prop_oneof![Just(", "), Just(" "), Just(": "), Just(",")];
        (synonym, year, publication, page, comment, separator, any::<bool>()).prop_map(
            |(synonym, year, publication, page, comment, separator, bold)| {
                let mut text = synonym.join(" ");
                if !text.is_empty() {
                    text.push_str(separator);
                }
                text.push_str(&year);
                if !publication.is_empty() {
                    text.push_str(", ");
                    text.push_str(&publication.join(" "));
                }
                if let Some(page) = page {
                    text.push_str(separator);
                    text.push_str(&page);
                }
                if let Some(comment) = comment {
                    if bold {
                        text.push_str(&format!(", **{}**", comment));
                    } else {
                        text.push_str(&format!(" ({})", comment));
                    }
                }
                text
            },
        )
    }

    proptest! {
        /// Property: format(parse(x)) is a fixed point of format ∘ parse
        #[test]
        fn test_format_parse_idempotent(
            segments in prop::collection::vec(citation_text(), 1..4),
            lead in prop::option::of("[A-Z][a-z]{3,8} [a-z]{3,8}"),
        ) {
            let mut parts = segments;
            if let Some(lead) = lead {
                parts.insert(0, lead);
            }
            let text = parts.join("; ");
            let once = round(&text);
            prop_assert_eq!(round(&once), once);
        }
    }
}
