//! Body content: Markdown clean-up and scanned-symbol repair

use crate::markdown::element_to_markdown;
use crate::query::Document;
use mob_domain::{BookOptions, FieldRule};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LEADING_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\*\*\*.*\n").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z]{2,})\.\s+([A-Z])").unwrap());
static HOLOTYPE_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(### Holotype)\s*\n\n(♂|♀)\.").unwrap());
static STRAY_PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\.\s*").unwrap());
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Emphasized labels that become section headings
static HEADINGS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\*{1,2}Taxonomic notes?[.:]?\*{1,2}", "### Taxonomic Notes"),
        (r"(?i)\*{1,2}Paratypes?[.:]?\*{1,2}", "### Paratype"),
        (r"(?i)\*{1,2}Diagnosis[.:]?\*{1,2}", "### Diagnosis"),
        (r"(?i)\*{1,2}Geographical range[.:]?\*{1,2}", "### Geographical range"),
        (r"(?i)\*{1,2}Habitat preference[.:]?\*{1,2}", "### Habitat preference"),
        (r"(?i)\*{1,2}Biology[.:]?\*{1,2}", "### Biology"),
    ]
    .into_iter()
    .map(|(pattern, heading)| (Regex::new(pattern).unwrap(), heading))
    .collect()
});
static HOLOTYPE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*{1,2}Holotype[.:]?\*{1,2}\s*(♂|♀)?").unwrap());

static OCR_PAIR_AFTER_NUMBER: Lazy<[(Regex, &'static str); 2]> = Lazy::new(|| {
    [
        (Regex::new(r"(\d+)\s*GG\b").unwrap(), "${1}♂♂"),
        (Regex::new(r"(\d+)\s*EE\b").unwrap(), "${1}♀♀"),
    ]
});
static OCR_PAIR: Lazy<[(Regex, &'static str); 2]> = Lazy::new(|| {
    [
        (Regex::new(r"\bGG\b").unwrap(), "♂♂"),
        (Regex::new(r"\bEE\b").unwrap(), "♀♀"),
    ]
});
static OCR_AFTER_NUMBER: Lazy<[(Regex, &'static str); 2]> = Lazy::new(|| {
    [
        (Regex::new(r"(\d+)\s*G\b").unwrap(), "${1}♂"),
        (Regex::new(r"(\d+)\s*E\b").unwrap(), "${1}♀"),
    ]
});
static OCR_AFTER_TYPE: Lazy<[(Regex, &'static str); 2]> = Lazy::new(|| {
    [
        (Regex::new(r"(Holotype|Paratypes|Paratype)\s+G\b").unwrap(), "$1 ♂"),
        (Regex::new(r"(Holotype|Paratypes|Paratype)\s+E\b").unwrap(), "$1 ♀"),
    ]
});
static OCR_STANDALONE: Lazy<[(Regex, &'static str); 2]> = Lazy::new(|| {
    [
        (Regex::new(r"\bG\b(\.)?").unwrap(), "♂"),
        (Regex::new(r"\bE\b(\.)?").unwrap(), "♀"),
    ]
});

/// Scrape and clean the body content of a document
///
/// With `join_all_content` every match of the rule's selector contributes;
/// otherwise the match at the rule's index (or a fallback's) is used.
pub fn extract_content(document: &Document, rule: &FieldRule, options: BookOptions) -> String {
    let markdown = if options.join_all_content {
        document
            .select_lenient(&rule.selector)
            .into_iter()
            .map(element_to_markdown)
            .filter(|md| !md.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    } else {
        document
            .resolve_rule(rule)
            .map(|(_, element)| element_to_markdown(element))
            .unwrap_or_default()
    };

    let body = format_body_content(&markdown);
    if options.ocr_symbol_repair {
        replace_ocr_symbols(&body)
    } else {
        body
    }
}

/// Turn converted Markdown into a sectioned species account
pub fn format_body_content(markdown: &str) -> String {
    let text = markdown.trim();
    if text.is_empty() {
        return String::new();
    }

    let text = LEADING_RULE.replace(text, "");
    let mut text = WHITESPACE.replace_all(&text, " ").into_owned();

    for (pattern, heading) in HEADINGS.iter() {
        text = pattern
            .replace_all(&text, format!("\n\n{}\n\n", heading).as_str())
            .into_owned();
    }
    text = HOLOTYPE_HEADING
        .replace_all(&text, |caps: &Captures| match caps.get(1) {
            Some(symbol) => format!("\n\n### Holotype {}\n\n", symbol.as_str()),
            None => "\n\n### Holotype\n\n".to_string(),
        })
        .into_owned();

    text = SENTENCE_BREAK.replace_all(&text, "$1.\n\n$2").into_owned();
    text = format_paratype_lists(&text);
    text = HOLOTYPE_SYMBOL.replace_all(&text, "$1 $2\n\n").into_owned();
    text = STRAY_PERIOD.replace_all(&text, "\n").into_owned();
    text = BLANK_RUN.replace_all(&text, "\n\n").into_owned();

    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Rewrite `### Paratype` sections of the form `: a; b; c` as bullet lists
fn format_paratype_lists(text: &str) -> String {
    const HEADER: &str = "### Paratype\n\n";
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(HEADER) {
        let body_start = start + HEADER.len();
        out.push_str(&rest[..body_start]);
        let body_len = rest[body_start..]
            .find("\n\n###")
            .unwrap_or(rest.len() - body_start);
        let body = &rest[body_start..body_start + body_len];

        let trimmed = body.trim();
        match trimmed.strip_prefix(':') {
            Some(list) if list.contains(';') => {
                let items: Vec<String> = list
                    .split(';')
                    .map(|item| format!("- {}", item.trim()))
                    .collect();
                out.push_str(&items.join("\n"));
            }
            _ => out.push_str(body),
        }
        rest = &rest[body_start + body_len..];
    }
    out.push_str(rest);
    out
}

/// Repair male/female symbols that scanning turned into `G`/`E`
///
/// A standalone `G.` or `E.` is an initial and is left alone.
pub fn replace_ocr_symbols(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut text = text.to_string();
    for stage in [
        &*OCR_PAIR_AFTER_NUMBER,
        &*OCR_PAIR,
        &*OCR_AFTER_NUMBER,
        &*OCR_AFTER_TYPE,
    ] {
        for (pattern, replacement) in stage.iter() {
            text = pattern.replace_all(&text, *replacement).into_owned();
        }
    }
    for (pattern, symbol) in OCR_STANDALONE.iter() {
        text = pattern
            .replace_all(&text, |caps: &Captures| {
                if caps.get(1).is_some() {
                    caps[0].to_string()
                } else {
                    symbol.to_string()
                }
            })
            .into_owned();
    }
    text
}
