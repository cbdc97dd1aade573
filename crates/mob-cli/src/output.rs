//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use mob_domain::{Field, FieldRule, ParsedCitation, RuleSet};
use mob_extractor::{format_citation, ExtractionResult, Suggestion};
use mob_refiner::Prompt;
use std::collections::BTreeMap;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const PREVIEW_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format one extraction result.
    pub fn format_result(&self, result: &ExtractionResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&result_json(result))?),
            OutputFormat::Table => Ok(self.format_result_table(result)),
            OutputFormat::Quiet => Ok(result.record.slug()),
        }
    }

    fn format_result_table(&self, result: &ExtractionResult) -> String {
        let record = &result.record;
        let statuses: Vec<&str> = record.taxonomic_status.iter().map(String::as_str).collect();

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["Genus", record.genus.as_str()]);
        builder.push_record(["Name", record.name.as_str()]);
        builder.push_record(["Author", record.author.as_deref().unwrap_or("")]);
        builder.push_record(["Status", &statuses.join(", ")]);
        builder.push_record(["Citations", &record.citations.join("\n")]);
        builder.push_record(["Content", &preview(&record.body_content)]);
        builder.push_record(["Plates", &record.plates.len().to_string()]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let verdict = if result.validation.is_valid() {
            self.success(&format!("{} accepted", record.slug()))
        } else {
            let reasons: Vec<String> = result.validation.reasons.iter().map(|r| r.to_string()).collect();
            self.error(&format!("{} rejected: {}", record.slug(), reasons.join("; ")))
        };
        format!("{}\n{}", table, verdict)
    }

    /// Format parsed citations.
    pub fn format_citations(&self, citations: &[ParsedCitation]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(citations)?),
            OutputFormat::Quiet => Ok(citations.iter().map(format_citation).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if citations.is_empty() {
                    return Ok(self.colorize("No citations found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Synonym", "Year", "Publication", "Pages", "Comment", "Formatted"]);
                for citation in citations {
                    builder.push_record([
                        citation.synonym.as_str(),
                        citation.year.as_str(),
                        citation.publication.as_str(),
                        citation.page_reference.as_str(),
                        citation.comment.as_str(),
                        &format_citation(citation),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format selector suggestions per field.
    pub fn format_suggestions(&self, suggestions: &BTreeMap<Field, Vec<Suggestion>>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: BTreeMap<String, Vec<serde_json::Value>> = suggestions
                    .iter()
                    .map(|(field, list)| {
                        let entries = list
                            .iter()
                            .map(|s| serde_json::json!({ "rule": s.rule, "text": s.text }))
                            .collect();
                        (field.to_string(), entries)
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(suggestions
                .iter()
                .flat_map(|(field, list)| {
                    list.iter()
                        .map(move |s| format!("{}\t{}\t{}", field, s.rule.selector, s.rule.index))
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if suggestions.values().all(Vec::is_empty) {
                    return Ok(self.colorize("No suggestions found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Field", "#", "Selector", "Index", "Text"]);
                for (field, list) in suggestions {
                    for (i, suggestion) in list.iter().enumerate() {
                        builder.push_record([
                            field.to_string(),
                            i.to_string(),
                            suggestion.rule.selector.clone(),
                            suggestion.rule.index.to_string(),
                            preview(&suggestion.text),
                        ]);
                    }
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a book's rule set.
    pub fn format_rules(&self, book: &str, rules: &RuleSet) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rules)?),
            OutputFormat::Quiet => Ok(rules
                .fields()
                .map(|(field, rule)| format!("{}\t{}", field, describe_rule(rule)))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Selector", "Index", "Method", "Fallbacks"]);
                for (field, rule) in rules.fields() {
                    builder.push_record([
                        field.to_string(),
                        rule.selector.clone(),
                        rule.index.to_string(),
                        rule.method.to_string(),
                        rule.fallbacks.len().to_string(),
                    ]);
                }
                Ok(format!("{}\n{}", self.info(&format!("Rules for '{}'", book)), self.render(builder)))
            }
        }
    }

    /// Format the list of books with a rule set.
    pub fn format_books(&self, books: &[&str]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(books)?),
            _ if books.is_empty() => Ok(self.colorize("No rule sets defined.", "yellow")),
            _ => Ok(books.join("\n")),
        }
    }

    /// Format a refinement prompt for the terminal operator.
    pub fn format_prompt(&self, prompt: &Prompt) -> String {
        let failing: Vec<String> = prompt.failing_fields.iter().map(|f| f.to_string()).collect();
        let mut lines = vec![
            self.colorize(&format!("== {} ({}) ==", prompt.field, prompt.state), "cyan"),
            format!("Failing: {}", failing.join(", ")),
        ];
        for reason in &prompt.reasons {
            lines.push(self.warning(reason));
        }
        match &prompt.current_rule {
            Some(rule) => lines.push(format!("Current:   {} -> {:?}", describe_rule(rule), prompt.current_value)),
            None => lines.push("Current:   (no rule)".to_string()),
        }
        if let (Some(rule), Some(value)) = (&prompt.candidate_rule, &prompt.candidate_value) {
            lines.push(self.colorize(&format!("Candidate: {} -> {:?}", describe_rule(rule), value), "magenta"));
        }
        for (i, suggestion) in prompt.suggestions.iter().enumerate() {
            lines.push(format!(
                "  [{}] {} [{}]  {}",
                i,
                suggestion.rule.selector,
                suggestion.rule.index,
                preview(&suggestion.text)
            ));
        }
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

/// JSON view of an extraction result, as written by `scrape --output`.
pub fn result_json(result: &ExtractionResult) -> serde_json::Value {
    let reasons: Vec<String> = result.validation.reasons.iter().map(|r| r.to_string()).collect();
    serde_json::json!({
        "slug": result.record.slug(),
        "record": result.record,
        "valid": result.validation.is_valid(),
        "failing_fields": result.validation.failing_fields,
        "reasons": reasons,
        "quality_score": result.validation.quality_score,
        "book": result.metadata.book,
        "used_default_rules": result.metadata.used_default_rules,
        "registry_version": result.metadata.registry_version,
    })
}

/// One-line description of a rule.
pub fn describe_rule(rule: &FieldRule) -> String {
    format!("'{}' [{}] {}", rule.selector, rule.index, rule.method)
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_WIDTH {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_WIDTH).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mob_domain::{Method, ScrapedRecord};
    use mob_extractor::ExtractionMetadata;
    use mob_gatekeeper::Gatekeeper;

    fn create_test_result() -> ExtractionResult {
        let record = ScrapedRecord {
            name: "albipuncta".to_string(),
            genus: "Cyana".to_string(),
            author: Some("Holloway".to_string()),
            body_content: "Diagnosis. A small white species.".to_string(),
            citations: vec!["albipuncta Holloway, 1976".to_string()],
            ..Default::default()
        };
        let validation = Gatekeeper::default_config().validate(&record);
        ExtractionResult {
            record,
            validation,
            metadata: ExtractionMetadata {
                book: "seven".to_string(),
                used_default_rules: false,
                registry_version: 0,
            },
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_result(&create_test_result()).unwrap();
        assert!(output.contains("\"slug\": \"cyana-albipuncta\""));
        assert!(output.contains("\"valid\": false"));
        assert!(output.contains("quality_score"));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_result(&create_test_result()).unwrap();
        assert_eq!(output, "cyana-albipuncta");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_result(&create_test_result()).unwrap();
        assert!(output.contains("Citations"));
        assert!(output.contains("✗ cyana-albipuncta rejected"));
    }

    #[test]
    fn test_empty_citations() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_citations(&[]).unwrap();
        assert!(output.contains("No citations found"));
    }

    #[test]
    fn test_rules_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let rules = RuleSet::default().with(
            Field::Author,
            FieldRule::new("p b", -1).with_method(Method::LastWord),
        );
        let output = formatter.format_rules("seven", &rules).unwrap();
        assert_eq!(output, "author\t'p b' [-1] last_word");
    }

    #[test]
    fn test_preview_truncates() {
        let long = "word ".repeat(30);
        let short = preview(&long);
        assert_eq!(short.chars().count(), PREVIEW_WIDTH + 1);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
