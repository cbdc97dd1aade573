//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use mob_domain::Field;
use std::path::PathBuf;

/// MoB scraper - Extract species records from legacy HTML pages.
#[derive(Debug, Parser)]
#[command(name = "mob")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MOB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Rules file, overriding the configured one
    #[arg(long, global = true, env = "MOB_RULES")]
    pub rules_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (slugs and formatted strings only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract and validate records from one or more pages
    Scrape(ScrapeArgs),

    /// Interactively fix a book's rules against a page
    Refine(RefineArgs),

    /// Parse and reformat a citation line
    Citation(CitationArgs),

    /// Suggest selectors for a page
    Suggest(SuggestArgs),

    /// Inspect and edit rule sets
    Rules(RulesArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the scrape command.
#[derive(Debug, Parser)]
pub struct ScrapeArgs {
    /// Book identifier selecting the rule set
    #[arg(short, long)]
    pub book: String,

    /// Genus to use when none is scraped
    #[arg(short, long, default_value = "Unknown")]
    pub genus: String,

    /// Write accepted records as JSON into this directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the refine command.
#[derive(Debug, Parser)]
pub struct RefineArgs {
    /// Book whose rules are refined
    #[arg(short, long)]
    pub book: String,

    /// Genus to use when none is scraped
    #[arg(short, long, default_value = "Unknown")]
    pub genus: String,

    /// Page to refine against
    pub file: PathBuf,
}

/// Arguments for the citation command.
#[derive(Debug, Parser)]
pub struct CitationArgs {
    /// Source recorded with the parsed citations
    #[arg(short, long, default_value = "cli")]
    pub source: String,

    /// Citation text
    #[arg(required = true)]
    pub text: Vec<String>,
}

/// Arguments for the suggest command.
#[derive(Debug, Parser)]
pub struct SuggestArgs {
    /// Only show suggestions for this field
    #[arg(long, value_enum)]
    pub field: Option<FieldArg>,

    /// Word the rule should pick out; shows the inferred method
    #[arg(short, long)]
    pub target: Option<String>,

    /// Page file
    pub file: PathBuf,
}

/// Arguments for rule management.
#[derive(Debug, Parser)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

/// Rule management actions.
#[derive(Debug, Subcommand)]
pub enum RulesAction {
    /// List books with rule sets
    List,

    /// Show a book's rules (falls back to default)
    Show {
        /// Book identifier
        book: String,
    },

    /// Set one field rule
    Set {
        /// Book identifier
        book: String,
        /// Field to set
        #[arg(value_enum)]
        field: FieldArg,
        /// CSS selector
        selector: String,
        /// Occurrence index (negative counts from the end)
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        index: i64,
        /// Extraction method
        #[arg(short, long, default_value = "full_text")]
        method: String,
    },

    /// Remove one field rule
    Remove {
        /// Book identifier
        book: String,
        /// Field to remove
        #[arg(value_enum)]
        field: FieldArg,
    },
}

/// Field argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FieldArg {
    /// Species name
    Name,
    /// Genus
    Genus,
    /// Author
    Author,
    /// Citation
    Citation,
    /// Body content
    Content,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<FieldArg> for Field {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Name => Field::Name,
            FieldArg::Genus => Field::Genus,
            FieldArg::Author => Field::Author,
            FieldArg::Citation => Field::Citation,
            FieldArg::Content => Field::Content,
        }
    }
}
