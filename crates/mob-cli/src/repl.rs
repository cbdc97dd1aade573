//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::cli::{CitationArgs, Command, RefineArgs, RulesArgs, ScrapeArgs, SuggestArgs};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use clap::Parser;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
pub fn run_repl(config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.info("MoB scraper REPL - Type 'help' for commands, 'exit' to quit"));
    println!();

    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(config.settings.history_size)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("mob> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(ReplCommand::Command(cmd)) => {
                        if let Err(e) = execute_repl_command(cmd, config, formatter) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug)]
enum ReplCommand {
    Exit,
    Help,
    Command(Command),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let words = split_words(line)?;
    let Some((head, args)) = words.split_first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    let command = match head.as_str() {
        "exit" | "quit" | "q" => return Ok(ReplCommand::Exit),
        "help" | "?" => return Ok(ReplCommand::Help),
        "scrape" => Command::Scrape(parse_args::<ScrapeArgs>(head, args)?),
        "refine" => Command::Refine(parse_args::<RefineArgs>(head, args)?),
        "citation" | "cite" => Command::Citation(parse_args::<CitationArgs>(head, args)?),
        "suggest" => Command::Suggest(parse_args::<SuggestArgs>(head, args)?),
        "rules" => Command::Rules(parse_args::<RulesArgs>(head, args)?),
        other => {
            return Err(CliError::InvalidInput(format!(
                "Unknown command: {}. Type 'help' for available commands.",
                other
            )))
        }
    };
    Ok(ReplCommand::Command(command))
}

fn parse_args<T: Parser>(name: &str, args: &[String]) -> Result<T> {
    let argv = std::iter::once(name).chain(args.iter().map(String::as_str));
    T::try_parse_from(argv).map_err(|e| CliError::InvalidInput(e.to_string()))
}

/// Split a line into words, keeping single- or double-quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CliError::InvalidInput("Unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Execute a REPL command.
fn execute_repl_command(cmd: Command, config: &Config, formatter: &Formatter) -> Result<()> {
    match cmd {
        Command::Scrape(args) => commands::execute_scrape(args, config, formatter),
        Command::Refine(args) => commands::execute_refine(args, config, formatter),
        Command::Citation(args) => commands::execute_citation(args, config, formatter),
        Command::Suggest(args) => commands::execute_suggest(args, formatter),
        Command::Rules(args) => commands::execute_rules(args, config, formatter),
        Command::Repl => Err(CliError::InvalidInput("Already in REPL mode".to_string())),
    }
}

fn get_history_path() -> Result<PathBuf> {
    Ok(Config::dir()?.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  scrape -b <book> <file>...          - Extract and validate pages");
    println!("  refine -b <book> <file>             - Fix a book's rules interactively");
    println!("  citation <text>                     - Parse and reformat a citation");
    println!("  suggest [--field f] [-t word] <file> - Suggest selectors for a page");
    println!("  rules [list|show|set|remove]        - Inspect and edit rule sets");
    println!("  help, ?                             - Show this help");
    println!("  exit, quit, q                       - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RulesAction;

    #[test]
    fn test_split_words_keeps_quoted_selector() {
        let words = split_words(r#"rules set seven author "p b" --index -1"#).unwrap();
        assert_eq!(words, vec!["rules", "set", "seven", "author", "p b", "--index", "-1"]);
        assert!(split_words("citation 'open").is_err());
    }

    #[test]
    fn test_parse_exit_and_help() {
        assert!(matches!(parse_repl_command("quit").unwrap(), ReplCommand::Exit));
        assert!(matches!(parse_repl_command("?").unwrap(), ReplCommand::Help));
    }

    #[test]
    fn test_parse_rules_set() {
        match parse_repl_command("rules set seven author 'p b' -i -1 -m last_word").unwrap() {
            ReplCommand::Command(Command::Rules(RulesArgs {
                action: RulesAction::Set { selector, index, .. },
            })) => {
                assert_eq!(selector, "p b");
                assert_eq!(index, -1);
            }
            other => panic!("Expected rules set, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_citation() {
        match parse_repl_command("cite Cyana albipuncta Holloway, 1976").unwrap() {
            ReplCommand::Command(Command::Citation(args)) => {
                assert_eq!(args.text.join(" "), "Cyana albipuncta Holloway, 1976");
            }
            other => panic!("Expected citation, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_repl_command("connect").is_err());
        assert!(parse_repl_command("scrape").is_err());
    }
}
