//! MoB scraper CLI library.
//!
//! Command definitions, configuration, output formatting, the terminal
//! operator for rule refinement, and the REPL behind the `mob` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod operator;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use operator::TerminalOperator;
pub use output::Formatter;
