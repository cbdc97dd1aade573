//! Interactive rule refinement against one page.

use super::read_page;
use crate::cli::RefineArgs;
use crate::config::Config;
use crate::error::Result;
use crate::operator::TerminalOperator;
use crate::output::Formatter;
use mob_extractor::ExtractionRequest;
use mob_refiner::{run_session, RefinementSession, RefinementState, SessionOutcome};

/// Execute the refine command.
///
/// A committed outcome is written back to the rules file; an abandoned one
/// leaves it untouched.
pub fn execute_refine(args: RefineArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let extractor = config.build_extractor()?;
    let (registry, store) = config.open_registry()?;
    let html = read_page(&args.file)?;
    let request = ExtractionRequest::new(html, &args.book, &args.genus)
        .with_source(args.file.display().to_string());

    let session = RefinementSession::new(&extractor, registry, request)?;
    if session.state() == RefinementState::Committed {
        println!("{}", formatter.success("Record already passes validation, nothing to refine"));
        return Ok(());
    }

    let mut operator = TerminalOperator::new(formatter)?;
    match run_session(session, &mut operator)? {
        SessionOutcome::Committed {
            registry,
            rules,
            forced,
        } => {
            registry.persist(&store)?;
            println!("{}", formatter.format_rules(&args.book, &rules)?);
            if forced {
                println!("{}", formatter.warning("Committed although the record still fails validation"));
            }
            println!(
                "{}",
                formatter.success(&format!(
                    "Saved rules for '{}' to {} (registry v{})",
                    args.book,
                    store.path().display(),
                    registry.version()
                ))
            );
        }
        SessionOutcome::Abandoned => {
            println!("{}", formatter.warning("Refinement abandoned, rules unchanged"));
        }
    }

    Ok(())
}
