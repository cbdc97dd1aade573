//! Rule set inspection and editing.

use crate::cli::{RulesAction, RulesArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use mob_domain::{Field, FieldRule, Method, DEFAULT_BOOK};
use tracing::info;

/// Execute a rules action.
///
/// `set` on a book without its own rule set starts from a copy of the
/// rules the book currently resolves to.
pub fn execute_rules(args: RulesArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (registry, store) = config.open_registry()?;

    match args.action {
        RulesAction::List => {
            let books: Vec<&str> = registry.books().collect();
            println!("{}", formatter.format_books(&books)?);
        }
        RulesAction::Show { book } => {
            let rules = registry.rules_for(&book)?;
            if registry.book_rules(&book).is_none() {
                println!("{}", formatter.info(&format!("'{}' has no rules, showing '{}'", book, DEFAULT_BOOK)));
            }
            println!("{}", formatter.format_rules(&book, rules)?);
        }
        RulesAction::Set {
            book,
            field,
            selector,
            index,
            method,
        } => {
            let field: Field = field.into();
            let mut rules = match registry.book_rules(&book) {
                Some(rules) => rules.clone(),
                None => registry.rules_for(&book).cloned().unwrap_or_default(),
            };
            rules.set(field, FieldRule::new(selector, index).with_method(Method::parse(&method)));

            let next = registry.commit(&book, rules);
            next.persist(&store)?;
            info!("Set {} rule for '{}'", field, book);
            println!("{}", formatter.success(&format!("Updated {} rule for '{}'", field, book)));
        }
        RulesAction::Remove { book, field } => {
            let field: Field = field.into();
            let mut rules = registry
                .book_rules(&book)
                .cloned()
                .ok_or_else(|| CliError::InvalidInput(format!("No rule set for '{}'", book)))?;
            if rules.remove(field).is_none() {
                return Err(CliError::InvalidInput(format!("'{}' has no {} rule", book, field)));
            }

            registry.commit(&book, rules).persist(&store)?;
            println!("{}", formatter.success(&format!("Removed {} rule from '{}'", field, book)));
        }
    }

    Ok(())
}
