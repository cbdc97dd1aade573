//! Batch scraping of species pages.

use crate::cli::ScrapeArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::{result_json, Formatter};
use mob_domain::traits::RecordSink;
use mob_domain::ScrapedRecord;
use mob_extractor::ExtractionRequest;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Writes accepted records as `<dir>/<book>/<slug>.json`.
pub struct JsonDirSink {
    root: PathBuf,
}

impl JsonDirSink {
    /// Sink rooted at `root`; directories are created on first write.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl RecordSink for JsonDirSink {
    type Error = CliError;

    fn persist(&mut self, book: &str, record: &ScrapedRecord) -> Result<()> {
        let dir = self.root.join(book);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.json", record.slug()));
        fs::write(&path, serde_json::to_string_pretty(record)?)?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

/// Read a page, tolerating legacy non-UTF-8 bytes.
pub fn read_page(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Execute the scrape command.
pub fn execute_scrape(args: ScrapeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let extractor = config.build_extractor()?;
    let (registry, _store) = config.open_registry()?;
    let mut sink = args.output.as_ref().map(JsonDirSink::new);

    let mut accepted = 0usize;
    let mut rejected = 0usize;
    let mut skipped = 0usize;
    let mut results = Vec::new();

    for file in &args.files {
        let html = match read_page(file) {
            Ok(html) => html,
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                skipped += 1;
                continue;
            }
        };

        let request = ExtractionRequest::new(html, &args.book, &args.genus)
            .with_source(file.display().to_string());
        let result = match extractor.extract(&registry, &request) {
            Ok(result) => result,
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                skipped += 1;
                continue;
            }
        };

        if result.validation.is_valid() {
            accepted += 1;
            if let Some(sink) = sink.as_mut() {
                if let Err(e) = sink.persist(&args.book, &result.record) {
                    warn!("Could not write {}: {}", result.record.slug(), e);
                }
            }
        } else {
            rejected += 1;
            info!("{} needs refinement ({})", file.display(), result.record.slug());
        }

        match formatter.format() {
            OutputFormat::Json => results.push(result_json(&result)),
            _ => println!("{}", formatter.format_result(&result)?),
        }
    }

    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Quiet => {}
        OutputFormat::Table => {
            println!(
                "{}",
                formatter.info(&format!(
                    "{} accepted, {} rejected, {} skipped",
                    accepted, rejected, skipped
                ))
            );
        }
    }

    Ok(())
}
