//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Glean - Ranked insights over country/year indicator panels
#[derive(Parser)]
#[command(name = "glean")]
#[command(about = "Auto-insights engine for tidy indicator panels", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the insight engine over a panel CSV
    Analyze {
        /// Panel CSV file (country,year,indicator,value)
        #[arg(short, long)]
        file: PathBuf,

        /// Indicator code to analyze
        #[arg(short, long)]
        indicator: String,

        /// Comma-separated country list
        #[arg(short, long)]
        countries: String,

        /// First year of the range (inclusive)
        #[arg(long)]
        from: i32,

        /// Last year of the range (inclusive)
        #[arg(long)]
        to: i32,

        /// Comma-separated insight types (default: all)
        #[arg(short, long)]
        types: Option<String>,

        /// Maximum number of ranked insights
        #[arg(short, long, default_value = "10")]
        max: usize,

        /// Restrict analysis to the most data-complete countries
        #[arg(long)]
        focus: bool,

        /// Treat lower indicator values as better (default: higher is better)
        #[arg(long)]
        lower_is_better: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// TOML file overriding the scoring thresholds
        #[arg(long)]
        scoring: Option<PathBuf>,
    },

    /// List the available insight types
    Types,

    /// Dry-run a panel CSV and report what it contains
    Validate {
        /// Panel CSV file to check
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text report
    Text,
    /// One CSV row per insight
    Csv,
    /// Full ranked result as JSON
    Json,
}
