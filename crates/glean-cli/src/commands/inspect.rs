//! Inspection commands: list insight types, dry-run a panel file

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use glean_core::{ingest, InsightType};

pub fn cmd_types() -> Result<()> {
    println!("Available insight types (tie-break priority in parentheses):\n");
    let mut types: Vec<InsightType> = InsightType::all().to_vec();
    types.sort_by(|a, b| b.priority().cmp(&a.priority()));
    for ty in types {
        println!("  {:<12} ({})", ty.as_str(), ty.priority());
    }
    Ok(())
}

pub fn cmd_validate(file: &Path) -> Result<()> {
    let observations = ingest::load_panel_file(file)
        .with_context(|| format!("loading panel from {}", file.display()))?;

    if observations.is_empty() {
        println!("{}: no observations", file.display());
        return Ok(());
    }

    // indicator -> (rows, countries, min year, max year)
    let mut summary: BTreeMap<&str, (usize, std::collections::BTreeSet<&str>, i32, i32)> =
        BTreeMap::new();
    for obs in &observations {
        let entry = summary
            .entry(&obs.indicator)
            .or_insert((0, Default::default(), obs.year, obs.year));
        entry.0 += 1;
        entry.1.insert(&obs.country);
        entry.2 = entry.2.min(obs.year);
        entry.3 = entry.3.max(obs.year);
    }

    println!("{}: {} observations\n", file.display(), observations.len());
    println!("{:<24} {:>6} {:>10} {:>12}", "indicator", "rows", "countries", "years");
    for (indicator, (rows, countries, min_year, max_year)) in &summary {
        println!(
            "{:<24} {:>6} {:>10} {:>7}-{}",
            indicator,
            rows,
            countries.len(),
            min_year,
            max_year
        );
    }

    Ok(())
}
