//! HTML subtree to Markdown conversion
//!
//! Covers the markup found in species accounts: emphasis, paragraphs, line
//! breaks, headings, lists and tables. Links are reduced to their text and
//! images are dropped (they are collected separately).

use scraper::{ElementRef, Node};

/// Conversion settings
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownOptions<'a> {
    /// Tags rendered as their bare content
    pub strip: &'a [&'a str],

    /// Element left out of the output entirely
    pub skip: Option<ElementRef<'a>>,
}

/// Convert an element and its descendants to Markdown
pub fn element_to_markdown(element: ElementRef<'_>) -> String {
    convert(element, &MarkdownOptions::default())
}

/// Convert with explicit options
pub fn convert<'a>(element: ElementRef<'a>, options: &MarkdownOptions<'a>) -> String {
    let mut out = String::new();
    render_element(element, options, &mut out);
    out.trim().to_string()
}

fn render_children<'a>(element: ElementRef<'a>, options: &MarkdownOptions<'a>) -> String {
    let mut out = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(&mut out, text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    render_element(child, options, &mut out);
                }
            }
            _ => {}
        }
    }
    out
}

fn render_element<'a>(element: ElementRef<'a>, options: &MarkdownOptions<'a>, out: &mut String) {
    if options.skip.is_some_and(|skip| skip.id() == element.id()) {
        return;
    }

    let tag = element.value().name();
    if options.strip.contains(&tag) {
        out.push_str(&render_children(element, options));
        return;
    }

    match tag {
        "script" | "style" | "head" | "title" | "img" => {}
        "b" | "strong" => out.push_str(&emphasize(&render_children(element, options), "**")),
        "i" | "em" => out.push_str(&emphasize(&render_children(element, options), "*")),
        "p" | "div" | "blockquote" => {
            out.push_str("\n\n");
            out.push_str(render_children(element, options).trim());
            out.push_str("\n\n");
        }
        "br" => out.push_str("  \n"),
        "hr" => out.push_str("\n\n***\n\n"),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse::<usize>().unwrap_or(1);
            out.push_str("\n\n");
            out.push_str(&"#".repeat(level));
            out.push(' ');
            out.push_str(render_children(element, options).trim());
            out.push_str("\n\n");
        }
        "ul" | "ol" => {
            out.push_str("\n\n");
            out.push_str(render_children(element, options).trim());
            out.push_str("\n\n");
        }
        "li" => {
            out.push_str("\n* ");
            out.push_str(render_children(element, options).trim());
        }
        "td" | "th" => {
            out.push_str(&render_children(element, options));
            out.push(' ');
        }
        "tr" => {
            out.push_str(&render_children(element, options));
            out.push('\n');
        }
        _ => out.push_str(&render_children(element, options)),
    }
}

/// Text node with runs of whitespace collapsed to one space
fn push_text(out: &mut String, text: &str) {
    let mut previous_space = out.ends_with(' ');
    for c in text.chars() {
        if c.is_whitespace() {
            if !previous_space {
                out.push(' ');
                previous_space = true;
            }
        } else {
            out.push(c);
            previous_space = false;
        }
    }
}

/// Wrap `inner` in `marker`, keeping the surrounding whitespace outside
fn emphasize(inner: &str, marker: &str) -> String {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return if inner.is_empty() { String::new() } else { " ".to_string() };
    }
    let prefix = if inner.starts_with(char::is_whitespace) { " " } else { "" };
    let suffix = if inner.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{}{}{}{}{}", prefix, marker, trimmed, marker, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        html.select(&Selector::parse(selector).unwrap()).next().unwrap()
    }

    #[test]
    fn test_emphasis() {
        let html = Html::parse_fragment(
            "<div><b>Diagnosis. </b>Forewing <i>pale</i> with <a href='x'>link</a>.</div>",
        );
        assert_eq!(
            element_to_markdown(first(&html, "div")),
            "**Diagnosis.** Forewing *pale* with link."
        );
    }

    #[test]
    fn test_paragraphs_and_breaks() {
        let html = Html::parse_fragment("<div><p>One\n  two</p><p>Three<br>four</p></div>");
        assert_eq!(
            element_to_markdown(first(&html, "div")),
            "One two\n\n\n\nThree  \nfour"
        );
    }

    #[test]
    fn test_strip_and_skip() {
        let html = Html::parse_fragment(
            "<p><b>Cyana albipuncta</b> <i>Cyana albipuncta</i> Holloway, 1976</p>",
        );
        let container = first(&html, "p");
        let bold = first(&html, "b");
        let options = MarkdownOptions {
            strip: &["p", "a"],
            skip: Some(bold),
        };
        assert_eq!(
            convert(container, &options),
            "*Cyana albipuncta* Holloway, 1976"
        );
    }

    #[test]
    fn test_images_and_scripts_dropped() {
        let html = Html::parse_fragment("<div><img src='p1.jpg'>Text<script>x()</script></div>");
        assert_eq!(element_to_markdown(first(&html, "div")), "Text");
    }
}
