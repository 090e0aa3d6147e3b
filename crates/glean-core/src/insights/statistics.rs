//! Distribution statistics insights
//!
//! Summarizes how the latest-year values spread across countries: one
//! dispersion insight (coefficient of variation) and one range insight
//! naming the extremes.

use crate::stats::{mean, median, sample_std};

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightType};

/// CV above which dispersion counts as "high", percent
const HIGH_DISPERSION_CV: f64 = 30.0;
/// CV above which dispersion counts as "moderate", percent
const MODERATE_DISPERSION_CV: f64 = 10.0;

/// Generator for cross-country distribution statistics
pub struct StatisticsGenerator;

impl StatisticsGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StatisticsGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator for StatisticsGenerator {
    fn name(&self) -> &'static str {
        "Statistics"
    }

    fn provides(&self) -> &'static [InsightType] {
        &[InsightType::Statistics]
    }

    fn generate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();
        let Some(latest) = ctx.latest_year else {
            return insights;
        };
        let indicator = &ctx.filter.indicator;

        let current = ctx.panel.values_in_year(latest);
        if current.len() < 2 {
            return insights;
        }
        let values: Vec<f64> = current.iter().map(|(_, v)| *v).collect();

        let year_mean = mean(&values).expect("current is non-empty");
        let year_median = median(&values).expect("current is non-empty");
        let std = sample_std(&values).expect("at least two values");

        // dispersion via coefficient of variation, undefined around zero mean
        if year_mean != 0.0 {
            let cv = std / year_mean.abs() * 100.0;
            let spread = if cv > HIGH_DISPERSION_CV {
                "high"
            } else if cv > MODERATE_DISPERSION_CV {
                "moderate"
            } else {
                "low"
            };
            insights.push(
                Insight::new(
                    InsightType::Statistics,
                    format!("Cross-country dispersion in {} is {}", latest, spread),
                    format!(
                        "Across {} countries, {} averages {:.2} (median {:.2}) with a \
                         standard deviation of {:.2}, a coefficient of variation of {:.1}%.",
                        current.len(),
                        indicator,
                        year_mean,
                        year_median,
                        std,
                        cv
                    ),
                )
                .with_year(latest)
                .with_evidence("mean_value", year_mean)
                .with_evidence("median_value", year_median)
                .with_evidence("std_dev", std)
                .with_evidence("coefficient_variation", cv),
            );
        }

        // range insight naming the extremes (value ties break alphabetically)
        let mut sorted = current.clone();
        sorted.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        let (min_name, min_value) = sorted.first().expect("non-empty").clone();
        let (max_name, max_value) = sorted.last().expect("non-empty").clone();
        insights.push(
            Insight::new(
                InsightType::Statistics,
                format!("Range of {} in {}", indicator, latest),
                format!(
                    "Values run from {:.2} ({}) to {:.2} ({}), a spread of {:.2}.",
                    min_value,
                    min_name,
                    max_value,
                    max_name,
                    max_value - min_value
                ),
            )
            .with_year(latest)
            .with_evidence("min_value", min_value)
            .with_evidence("max_value", max_value)
            .with_evidence("range_spread", max_value - min_value),
        );

        insights
    }
}
