//! Command implementations.

mod citation;
mod refine;
mod rules;
mod scrape;
mod suggest;

pub use citation::execute_citation;
pub use refine::execute_refine;
pub use rules::execute_rules;
pub use scrape::{execute_scrape, read_page, JsonDirSink};
pub use suggest::execute_suggest;
