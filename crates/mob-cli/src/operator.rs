//! Terminal operator for interactive refinement.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use mob_domain::{FieldRule, Method};
use mob_extractor::infer_method;
use mob_refiner::{Operator, OperatorResponse, Prompt};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT_HELP: &str = "Enter: accept | <n> [method]: try suggestion | t <n> <word>: infer method | \
s <index> <method> <selector>: custom rule | drop | force | abandon";

/// Operator answering prompts from the terminal.
pub struct TerminalOperator<'f> {
    editor: DefaultEditor,
    formatter: &'f Formatter,
}

impl<'f> TerminalOperator<'f> {
    /// Create an operator reading from stdin.
    pub fn new(formatter: &'f Formatter) -> Result<Self> {
        let editor = DefaultEditor::new()?;
        Ok(Self { editor, formatter })
    }
}

impl Operator for TerminalOperator<'_> {
    type Error = CliError;

    fn choose(&mut self, prompt: &Prompt) -> Result<OperatorResponse> {
        println!();
        println!("{}", self.formatter.format_prompt(prompt));
        println!("{}", self.formatter.info(PROMPT_HELP));

        loop {
            match self.editor.readline("refine> ") {
                Ok(line) => {
                    self.editor.add_history_entry(line.as_str()).ok();
                    match parse_response(&line, prompt) {
                        Ok(response) => return Ok(response),
                        Err(e) => eprintln!("{}", self.formatter.error(&e.to_string())),
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(OperatorResponse::Abandon),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Parse one line of operator input against the prompt it answers.
pub fn parse_response(line: &str, prompt: &Prompt) -> Result<OperatorResponse> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    match parts.as_slice() {
        [] | ["a" | "accept" | "y" | "yes"] => Ok(OperatorResponse::Accept),
        ["d" | "drop"] => Ok(OperatorResponse::Drop),
        ["f" | "force"] => Ok(OperatorResponse::Force),
        ["abandon" | "quit" | "q"] => Ok(OperatorResponse::Abandon),
        ["c" | "choose", rest @ ..] => parse_choice(rest),
        ["t" | "target", n, word] => {
            let suggestion = parse_index(n)?;
            let offered = prompt
                .suggestions
                .get(suggestion)
                .ok_or_else(|| CliError::InvalidInput(format!("No suggestion #{}", suggestion)))?;
            let method = infer_method(&offered.text, word).ok_or_else(|| {
                CliError::InvalidInput(format!("Cannot pick '{}' out of suggestion #{}", word, suggestion))
            })?;
            Ok(OperatorResponse::Choose { suggestion, method })
        }
        ["s" | "selector", index, method, selector @ ..] if !selector.is_empty() => {
            let index: i64 = index
                .parse()
                .map_err(|_| CliError::InvalidInput(format!("Invalid index: {}", index)))?;
            let rule = FieldRule::new(selector.join(" "), index).with_method(Method::parse(method));
            Ok(OperatorResponse::Custom { rule })
        }
        [first, ..] if first.chars().all(|c| c.is_ascii_digit()) => parse_choice(&parts),
        _ => Err(CliError::InvalidInput(format!("Unrecognized response: {}", line.trim()))),
    }
}

fn parse_choice(parts: &[&str]) -> Result<OperatorResponse> {
    match parts {
        [n] => Ok(OperatorResponse::Choose {
            suggestion: parse_index(n)?,
            method: Method::FullText,
        }),
        [n, method] => Ok(OperatorResponse::Choose {
            suggestion: parse_index(n)?,
            method: Method::parse(method),
        }),
        _ => Err(CliError::InvalidInput("Usage: c <n> [method]".to_string())),
    }
}

fn parse_index(s: &str) -> Result<usize> {
    s.parse()
        .map_err(|_| CliError::InvalidInput(format!("Invalid suggestion number: {}", s)))
}
