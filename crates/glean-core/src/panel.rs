//! Filtered, sorted panel and the data-preparation step
//!
//! `Panel::prepare` applies the filter context once: restrict to the selected
//! countries, indicator, and year range, drop non-finite values, sort by
//! (country, year), and apply the focus-mode pre-filter. Generators only ever
//! see a prepared panel.

use std::collections::BTreeSet;

use tracing::debug;

use crate::models::{FilterContext, Observation};

/// Number of countries retained by the focus-mode pre-filter.
const FOCUS_COUNTRY_LIMIT: usize = 3;

/// A filtered panel, sorted by (country, year).
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    rows: Vec<Observation>,
}

impl Panel {
    /// Apply the filter context to raw observations.
    ///
    /// An empty result is not an error; the engine turns it into an empty
    /// ranked result.
    pub fn prepare(observations: &[Observation], filter: &FilterContext) -> Self {
        let (min_year, max_year) = filter.year_range;
        let mut rows: Vec<Observation> = observations
            .iter()
            .filter(|o| {
                o.indicator == filter.indicator
                    && o.value.is_finite()
                    && o.year >= min_year
                    && o.year <= max_year
                    && filter.countries.contains(&o.country)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));

        let panel = Self { rows };
        if filter.focus_mode {
            panel.focus(filter)
        } else {
            panel
        }
    }

    /// Focus-mode pre-filter: keep the most data-complete countries.
    ///
    /// Ties in completeness break by country name ascending.
    fn focus(self, filter: &FilterContext) -> Self {
        let mut ranked: Vec<(String, f64)> = self
            .countries()
            .into_iter()
            .map(|c| {
                let pct = self.completeness(&c, filter.year_range);
                (c, pct)
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let keep: BTreeSet<String> = ranked
            .into_iter()
            .take(FOCUS_COUNTRY_LIMIT)
            .map(|(c, _)| c)
            .collect();
        debug!(countries = ?keep, "focus mode pre-filter applied");

        Self {
            rows: self
                .rows
                .into_iter()
                .filter(|o| keep.contains(&o.country))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Distinct countries present in the panel, ascending.
    pub fn countries(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for row in &self.rows {
            // rows are sorted by country, so duplicates are adjacent
            if out.last().map(|c| c.as_str()) != Some(row.country.as_str()) {
                out.push(row.country.clone());
            }
        }
        out
    }

    /// Yearly series for one country, ascending by year.
    pub fn series(&self, country: &str) -> Vec<(i32, f64)> {
        self.rows
            .iter()
            .filter(|o| o.country == country)
            .map(|o| (o.year, o.value))
            .collect()
    }

    /// Most recent year with any observation.
    pub fn latest_year(&self) -> Option<i32> {
        self.rows.iter().map(|o| o.year).max()
    }

    /// (country, value) pairs for one year, ascending by country.
    pub fn values_in_year(&self, year: i32) -> Vec<(String, f64)> {
        self.rows
            .iter()
            .filter(|o| o.year == year)
            .map(|o| (o.country.clone(), o.value))
            .collect()
    }

    /// Observed-years / years-in-range, as a percentage.
    pub fn completeness(&self, country: &str, year_range: (i32, i32)) -> f64 {
        let span = (year_range.1 - year_range.0 + 1) as f64;
        if span <= 0.0 {
            return 0.0;
        }
        let observed = self.rows.iter().filter(|o| o.country == country).count() as f64;
        observed / span * 100.0
    }

    /// Fraction of all (country, year) cells that carry an observation.
    pub fn overall_completeness(&self, year_range: (i32, i32)) -> f64 {
        let n_countries = self.countries().len();
        if n_countries == 0 {
            return 0.0;
        }
        let cells = (n_countries * ((year_range.1 - year_range.0 + 1) as usize)) as f64;
        self.rows.len() as f64 / cells * 100.0
    }

    /// Per-year cross-country mean series, ascending by year.
    pub fn yearly_means(&self) -> Vec<(i32, f64)> {
        let mut years: Vec<i32> = self.rows.iter().map(|o| o.year).collect();
        years.sort_unstable();
        years.dedup();

        years
            .into_iter()
            .map(|year| {
                let values: Vec<f64> = self
                    .rows
                    .iter()
                    .filter(|o| o.year == year)
                    .map(|o| o.value)
                    .collect();
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                (year, mean)
            })
            .collect()
    }
}
