//! Glean CLI - ranked insights over tidy indicator panels
//!
//! Usage:
//!   glean analyze --file panel.csv --indicator gini \
//!       --countries India,Nepal --from 2000 --to 2020
//!   glean types                  List insight types
//!   glean validate --file CSV    Dry-run a panel file

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::AnalyzeOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            indicator,
            countries,
            from,
            to,
            types,
            max,
            focus,
            lower_is_better,
            format,
            out,
            scoring,
        } => commands::cmd_analyze(AnalyzeOptions {
            file,
            indicator,
            countries,
            from,
            to,
            types,
            max,
            focus,
            lower_is_better,
            format,
            out,
            scoring,
        }),
        Commands::Types => commands::cmd_types(),
        Commands::Validate { file } => commands::cmd_validate(&file),
    }
}
