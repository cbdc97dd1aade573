//! Citation parsing from the command line.

use crate::cli::CitationArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use mob_extractor::CitationParser;

/// Execute the citation command.
pub fn execute_citation(args: CitationArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let parser = CitationParser::new(&config.extractor.exclusion_phrases);
    let citations = parser.parse(&args.text.join(" "), &args.source);
    println!("{}", formatter.format_citations(&citations)?);
    Ok(())
}
