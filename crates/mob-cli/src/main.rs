//! MoB scraper - extract species records from legacy Moths of Borneo pages.

use anyhow::Context;
use clap::Parser;
use mob_cli::commands;
use mob_cli::repl;
use mob_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mob=info")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let path = Config::path()?;
            let config = Config::load_from(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            if !path.exists() {
                config.save_to(&path).ok();
            }
            config
        }
    };

    if let Some(rules_file) = cli.rules_file {
        config.rules_path = rules_file;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None | Some(Command::Repl) => repl::run_repl(&config, &formatter)?,
        Some(Command::Scrape(args)) => commands::execute_scrape(args, &config, &formatter)?,
        Some(Command::Refine(args)) => commands::execute_refine(args, &config, &formatter)?,
        Some(Command::Citation(args)) => commands::execute_citation(args, &config, &formatter)?,
        Some(Command::Suggest(args)) => commands::execute_suggest(args, &formatter)?,
        Some(Command::Rules(args)) => commands::execute_rules(args, &config, &formatter)?,
    }

    Ok(())
}
