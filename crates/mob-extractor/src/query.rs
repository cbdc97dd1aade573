//! Document query layer
//!
//! Wraps a parsed HTML tree and resolves [`FieldRule`]s against it. Every
//! miss (invalid selector, no match, index out of range) resolves to nothing
//! rather than an error.

use crate::ExtractorError;
use mob_domain::FieldRule;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

static FONT_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<font[^>]*>").unwrap());
static FONT_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</font>").unwrap());

/// Remove `<font>` tags, keeping their content
///
/// Legacy editors nest these badly enough to confuse tree construction.
pub fn remove_font_tags(html: &str) -> String {
    let html = FONT_OPEN.replace_all(html, "");
    FONT_CLOSE.replace_all(&html, "").into_owned()
}

/// Text content of an element, control characters removed and whitespace
/// collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element
        .text()
        .flat_map(str::chars)
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A parsed species page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse raw markup, stripping font tags first
    pub fn parse(raw: &str) -> Self {
        Self {
            html: Html::parse_document(&remove_font_tags(raw)),
        }
    }

    /// The underlying tree
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Every element matching `selector`, in document order
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, ExtractorError> {
        let parsed = Selector::parse(selector).map_err(|e| ExtractorError::Selector {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.html.select(&parsed).collect())
    }

    /// Like [`Document::select`], but an invalid selector matches nothing
    pub fn select_lenient(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match self.select(selector) {
            Ok(elements) => elements,
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        }
    }

    /// The match at `index`; negative indices count from the end
    pub fn resolve_element(&self, selector: &str, index: i64) -> Option<ElementRef<'_>> {
        if selector.trim().is_empty() {
            return None;
        }
        let elements = self.select_lenient(selector);
        let len = elements.len() as i64;
        let position = if index < 0 { len + index } else { index };
        if position < 0 || position >= len {
            debug!(
                "Selector '{}' index {} out of range ({} matches)",
                selector, index, len
            );
            return None;
        }
        elements.get(position as usize).copied()
    }

    /// The element a rule resolves to, trying fallbacks in order
    ///
    /// Returns the rule that produced the match alongside it. An element with
    /// no text counts as a miss.
    pub fn resolve_rule<'r>(&self, rule: &'r FieldRule) -> Option<(&'r FieldRule, ElementRef<'_>)> {
        if let Some(element) = self.resolve_element(&rule.selector, rule.index) {
            if !element_text(element).is_empty() {
                return Some((rule, element));
            }
        }
        rule.fallbacks.iter().find_map(|fallback| self.resolve_rule(fallback))
    }

    /// Normalized text a rule resolves to, or an empty string
    pub fn resolve(&self, rule: &FieldRule) -> String {
        self.resolve_rule(rule)
            .map(|(_, element)| element_text(element))
            .unwrap_or_default()
    }
}
