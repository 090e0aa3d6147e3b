//! Anomaly insights
//!
//! Flags years where a country's value deviates more than a z-score
//! threshold from that country's own mean over the filtered range. At most
//! one insight per country, for the most extreme flagged year.

use tracing::debug;

use crate::stats::{mean, sample_std};

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightType};

/// Generator for within-country outlier years
pub struct AnomalyGenerator {
    /// Minimum observations per country (default 6)
    min_observations: usize,
    /// Absolute z-score above which a year is flagged (default 2.0)
    z_threshold: f64,
}

impl AnomalyGenerator {
    pub fn new() -> Self {
        Self {
            min_observations: 6,
            z_threshold: 2.0,
        }
    }

    pub fn with_thresholds(min_observations: usize, z_threshold: f64) -> Self {
        Self {
            min_observations,
            z_threshold,
        }
    }
}

impl Default for AnomalyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator for AnomalyGenerator {
    fn name(&self) -> &'static str {
        "Anomaly"
    }

    fn provides(&self) -> &'static [InsightType] {
        &[InsightType::Anomaly]
    }

    fn generate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();
        let indicator = &ctx.filter.indicator;

        for country in ctx.panel.countries() {
            let series = ctx.panel.series(&country);
            if series.len() < self.min_observations {
                continue;
            }

            let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
            let series_mean = mean(&values).expect("series is non-empty");
            let std = match sample_std(&values) {
                // a constant series has no anomalies by definition
                Some(s) if s > 0.0 => s,
                _ => {
                    debug!(country, "zero-variance series, skipping anomalies");
                    continue;
                }
            };

            // Most extreme flagged year; strict comparison keeps the earliest
            // year on ties since the series is ascending.
            let mut most_extreme: Option<(i32, f64, f64)> = None;
            for (year, value) in &series {
                let z = (value - series_mean) / std;
                if z.abs() <= self.z_threshold {
                    continue;
                }
                let replace = match most_extreme {
                    Some((_, _, best_z)) => z.abs() > best_z.abs(),
                    None => true,
                };
                if replace {
                    most_extreme = Some((*year, *value, z));
                }
            }

            let Some((year, value, z)) = most_extreme else {
                continue;
            };
            let direction = if z > 0.0 { "above" } else { "below" };
            let completeness = ctx.panel.completeness(&country, ctx.filter.year_range);

            insights.push(
                Insight::new(
                    InsightType::Anomaly,
                    format!("{}: anomalous {} in {}", country, indicator, year),
                    format!(
                        "The {} value of {:.2} sits {:.1} standard deviations {} \
                         {}'s mean of {:.2} for the selected range.",
                        year,
                        value,
                        z.abs(),
                        direction,
                        country,
                        series_mean
                    ),
                )
                .with_country(country.clone())
                .with_year(year)
                .with_evidence("z_score", z)
                .with_evidence("mean_value", series_mean)
                .with_evidence("completeness_pct", completeness),
            );
        }

        insights
    }
}
