//! CSV panel ingestion
//!
//! One canonical tidy format: a header row with `country,year,indicator,value`
//! (column order free, names case-insensitive), one observation per row.
//! An empty or non-numeric value cell means "no observation" and the row is
//! skipped; a later duplicate of the same (country, year, indicator) key
//! replaces the earlier one with a warning.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Observation;

/// Resolve a required column by case-insensitive header name.
fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::InvalidData(format!("missing required column: {}", name)))
}

/// Parse a tidy panel from CSV data.
pub fn load_panel<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let country_col = column(&headers, "country")?;
    let year_col = column(&headers, "year")?;
    let indicator_col = column(&headers, "indicator")?;
    let value_col = column(&headers, "value")?;

    let mut observations: BTreeMap<(String, i32, String), f64> = BTreeMap::new();
    let mut skipped = 0usize;

    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = index + 2;

        let country = record.get(country_col).unwrap_or("").to_string();
        let indicator = record.get(indicator_col).unwrap_or("").to_string();
        if country.is_empty() || indicator.is_empty() {
            return Err(Error::InvalidData(format!(
                "line {}: empty country or indicator",
                line
            )));
        }

        let year: i32 = record
            .get(year_col)
            .unwrap_or("")
            .parse()
            .map_err(|_| Error::InvalidData(format!("line {}: unparseable year", line)))?;

        let raw_value = record.get(value_col).unwrap_or("");
        let value: f64 = match raw_value.parse() {
            Ok(v) => v,
            Err(_) => {
                debug!(line, raw = raw_value, "skipping row without a numeric value");
                skipped += 1;
                continue;
            }
        };
        if !f64::is_finite(value) {
            debug!(line, "skipping row with non-finite value");
            skipped += 1;
            continue;
        }

        if observations.insert((country.clone(), year, indicator), value).is_some() {
            warn!(country, year, line, "duplicate observation key, keeping the later row");
        }
    }

    debug!(
        loaded = observations.len(),
        skipped, "panel ingestion complete"
    );

    Ok(observations
        .into_iter()
        .map(|((country, year, indicator), value)| Observation {
            country,
            year,
            indicator,
            value,
        })
        .collect())
}

/// Parse a tidy panel from a CSV file.
pub fn load_panel_file(path: impl AsRef<Path>) -> Result<Vec<Observation>> {
    let file = std::fs::File::open(path)?;
    load_panel(file)
}
