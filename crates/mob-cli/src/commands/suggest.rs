//! Selector suggestions for a page.

use super::read_page;
use crate::cli::SuggestArgs;
use crate::error::Result;
use crate::output::{describe_rule, Formatter};
use mob_domain::Field;
use mob_extractor::{infer_method, suggest_selectors, Document};

/// Execute the suggest command.
pub fn execute_suggest(args: SuggestArgs, formatter: &Formatter) -> Result<()> {
    let html = read_page(&args.file)?;
    let document = Document::parse(&html);
    let mut suggestions = suggest_selectors(&document);

    if let Some(field) = args.field {
        let field: Field = field.into();
        suggestions.retain(|f, _| *f == field);
    }
    println!("{}", formatter.format_suggestions(&suggestions)?);

    if let Some(target) = args.target.as_deref() {
        for (field, list) in &suggestions {
            for (i, suggestion) in list.iter().enumerate() {
                if let Some(method) = infer_method(&suggestion.text, target) {
                    let rule = suggestion.rule.clone().with_method(method);
                    println!(
                        "{}",
                        formatter.info(&format!("{} #{}: {}", field, i, describe_rule(&rule)))
                    );
                }
            }
        }
    }

    Ok(())
}
