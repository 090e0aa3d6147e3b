//! Analyze command: load a panel, run the engine, emit the report

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use glean_core::{
    format_insights_as_json, format_insights_as_text, ingest, write_insights_csv, FilterContext,
    IndicatorPolarity, InsightEngine, InsightType, ScoringConfig,
};

use crate::cli::OutputFormat;

/// Options for the analyze command, mirroring the CLI flags.
pub struct AnalyzeOptions {
    pub file: PathBuf,
    pub indicator: String,
    pub countries: String,
    pub from: i32,
    pub to: i32,
    pub types: Option<String>,
    pub max: usize,
    pub focus: bool,
    pub lower_is_better: bool,
    pub format: OutputFormat,
    pub out: Option<PathBuf>,
    pub scoring: Option<PathBuf>,
}

/// Parse the comma-separated insight type list.
fn parse_types(spec: &str) -> Result<Vec<InsightType>> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| InsightType::from_str(s).map_err(anyhow::Error::msg))
        .collect()
}

/// Build the filter context from CLI flags.
pub fn build_filter(options: &AnalyzeOptions) -> Result<FilterContext> {
    let countries: BTreeSet<String> = options
        .countries
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if countries.is_empty() {
        bail!("--countries must name at least one country");
    }

    let polarity = if options.lower_is_better {
        IndicatorPolarity::LowerIsBetter
    } else {
        IndicatorPolarity::HigherIsBetter
    };

    let mut filter = FilterContext::new(
        countries,
        options.indicator.clone(),
        polarity,
        (options.from, options.to),
        options.max,
    )
    .with_focus_mode(options.focus);

    if let Some(spec) = &options.types {
        let types = parse_types(spec)?;
        if types.is_empty() {
            bail!("--types must name at least one insight type");
        }
        filter = filter.with_types(types);
    }

    Ok(filter)
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

pub fn cmd_analyze(options: AnalyzeOptions) -> Result<()> {
    let observations = ingest::load_panel_file(&options.file)
        .with_context(|| format!("loading panel from {}", options.file.display()))?;
    tracing::info!(observations = observations.len(), "panel loaded");

    let filter = build_filter(&options)?;

    let engine = match &options.scoring {
        Some(path) => {
            let config = ScoringConfig::load(path)
                .with_context(|| format!("loading scoring config from {}", path.display()))?;
            InsightEngine::with_scoring(config)
        }
        None => InsightEngine::new(),
    };

    let result = engine.generate_ranked_insights(&observations, &filter)?;
    tracing::info!(
        shown = result.metadata.total_shown,
        generated = result.metadata.total_generated,
        "insight run complete"
    );

    match options.format {
        OutputFormat::Text => {
            write_output(options.out.as_deref(), &format_insights_as_text(&result))?;
        }
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            write_insights_csv(&result, &mut buffer)?;
            write_output(options.out.as_deref(), &String::from_utf8(buffer)?)?;
        }
        OutputFormat::Json => {
            write_output(options.out.as_deref(), &format_insights_as_json(&result)?)?;
        }
    }

    Ok(())
}
