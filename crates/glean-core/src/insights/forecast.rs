//! Forecast insights
//!
//! Naive linear extrapolation one year past the end of a country's series,
//! only where the trend fit is decent. Explicitly framed as an
//! extrapolation, not a forecast model.

use crate::stats::linear_fit;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightType};

/// Generator for next-year linear extrapolations
pub struct ForecastGenerator {
    /// Minimum observations per country (default 4)
    min_observations: usize,
    /// Minimum R-squared for the underlying fit (default 0.5)
    min_r_squared: f64,
}

impl ForecastGenerator {
    pub fn new() -> Self {
        Self {
            min_observations: 4,
            min_r_squared: 0.5,
        }
    }

    pub fn with_thresholds(min_observations: usize, min_r_squared: f64) -> Self {
        Self {
            min_observations,
            min_r_squared,
        }
    }
}

impl Default for ForecastGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator for ForecastGenerator {
    fn name(&self) -> &'static str {
        "Forecast"
    }

    fn provides(&self) -> &'static [InsightType] {
        &[InsightType::Forecast]
    }

    fn generate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();
        let indicator = &ctx.filter.indicator;

        for country in ctx.panel.countries() {
            let series = ctx.panel.series(&country);
            if series.len() < self.min_observations {
                continue;
            }

            let x: Vec<f64> = series.iter().map(|(year, _)| *year as f64).collect();
            let y: Vec<f64> = series.iter().map(|(_, value)| *value).collect();
            let Some(fit) = linear_fit(&x, &y) else {
                continue;
            };
            if fit.r_squared <= self.min_r_squared {
                continue;
            }

            let (last_year, last_value) = *series.last().expect("series is non-empty");
            let next_year = last_year + 1;
            let projected = fit.predict(next_year as f64);

            insights.push(
                Insight::new(
                    InsightType::Forecast,
                    format!(
                        "{}: {} projected at {:.2} for {}",
                        country, indicator, projected, next_year
                    ),
                    format!(
                        "A straight-line extrapolation of the {}-{} series (last value \
                         {:.2}) puts {} at {:.2} in {}. This is an extrapolation, not a \
                         forecast model.",
                        series[0].0, last_year, last_value, indicator, projected, next_year
                    ),
                )
                .with_country(country.clone())
                .with_year(next_year)
                .with_evidence("projected_value", projected)
                .with_evidence("r_squared", fit.r_squared)
                .with_evidence("slope", fit.slope),
            );
        }

        insights
    }
}
