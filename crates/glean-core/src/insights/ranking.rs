//! Ranking and comparison insights
//!
//! Works off the latest year present in the panel: best/worst performers,
//! per-country deviation from the cross-country average, and year-over-year
//! rank shifts when the previous year is available.

use tracing::debug;

use crate::models::IndicatorPolarity;
use crate::stats::mean;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightType};

/// Generator for latest-year rankings and average comparisons
pub struct RankingGenerator {
    /// Minimum relative deviation from the mean to report, percent (default 10)
    deviation_threshold_pct: f64,
}

impl RankingGenerator {
    pub fn new() -> Self {
        Self {
            deviation_threshold_pct: 10.0,
        }
    }

    pub fn with_deviation_threshold(deviation_threshold_pct: f64) -> Self {
        Self {
            deviation_threshold_pct,
        }
    }

    /// Countries ranked ascending by value, ties alphabetical. Rank 1 is the
    /// lowest value.
    fn rank(values: &[(String, f64)]) -> Vec<(String, f64)> {
        let mut ranked = values.to_vec();
        ranked.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }

    fn rank_of(ranked: &[(String, f64)], country: &str) -> Option<usize> {
        ranked.iter().position(|(c, _)| c == country).map(|i| i + 1)
    }
}

impl Default for RankingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator for RankingGenerator {
    fn name(&self) -> &'static str {
        "Ranking"
    }

    fn provides(&self) -> &'static [InsightType] {
        &[InsightType::Ranking, InsightType::Comparison]
    }

    fn generate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();
        let Some(latest) = ctx.latest_year else {
            return insights;
        };
        let indicator = &ctx.filter.indicator;

        let current = ctx.panel.values_in_year(latest);
        if current.len() < 2 {
            debug!(year = latest, "single country in latest year, no rankings");
            return insights;
        }

        let ranked = Self::rank(&current);

        // (a) best/worst performers
        let (low_name, low_value) = ranked.first().expect("ranked is non-empty").clone();
        let (high_name, high_value) = ranked.last().expect("ranked is non-empty").clone();
        let ((best_name, best_value), (worst_name, worst_value)) = match ctx.filter.polarity {
            IndicatorPolarity::LowerIsBetter => {
                ((low_name, low_value), (high_name, high_value))
            }
            IndicatorPolarity::HigherIsBetter => {
                ((high_name, high_value), (low_name, low_value))
            }
        };
        insights.push(
            Insight::new(
                InsightType::Ranking,
                format!("Best and worst performers in {}", latest),
                format!(
                    "{} leads on {} with {:.2}; {} trails with {:.2}.",
                    best_name, indicator, best_value, worst_name, worst_value
                ),
            )
            .with_year(latest)
            .with_evidence("best_value", best_value)
            .with_evidence("worst_value", worst_value),
        );

        // (b) deviation from the cross-country average
        let values: Vec<f64> = current.iter().map(|(_, v)| *v).collect();
        let year_mean = mean(&values).expect("current is non-empty");
        if year_mean != 0.0 {
            for (country, value) in &current {
                let deviation = (value - year_mean) / year_mean * 100.0;
                if deviation.abs() <= self.deviation_threshold_pct {
                    continue;
                }
                let direction = if deviation > 0.0 { "above" } else { "below" };
                let completeness = ctx.panel.completeness(country, ctx.filter.year_range);
                insights.push(
                    Insight::new(
                        InsightType::Comparison,
                        format!(
                            "{}: {:.1}% {} the {} average",
                            country,
                            deviation.abs(),
                            direction,
                            latest
                        ),
                        format!(
                            "{} {} stands at {:.2} against a cross-country average of {:.2}.",
                            country, indicator, value, year_mean
                        ),
                    )
                    .with_country(country.clone())
                    .with_year(latest)
                    .with_evidence("change_relative", deviation)
                    .with_evidence("mean_value", year_mean)
                    .with_evidence("completeness_pct", completeness),
                );
            }
        } else {
            debug!(year = latest, "zero mean, skipping average comparisons");
        }

        // (c) year-over-year rank shifts
        let previous = ctx.panel.values_in_year(latest - 1);
        if !previous.is_empty() {
            let previous_ranked = Self::rank(&previous);
            for (country, _) in &current {
                let Some(rank_latest) = Self::rank_of(&ranked, country) else {
                    continue;
                };
                let Some(rank_previous) = Self::rank_of(&previous_ranked, country) else {
                    continue;
                };
                // positive = moved toward rank 1
                let rank_change = rank_previous as i64 - rank_latest as i64;
                if rank_change == 0 {
                    continue;
                }
                let (verb, places) = if rank_change > 0 {
                    ("climbed", rank_change)
                } else {
                    ("dropped", -rank_change)
                };
                let noun = if places == 1 { "place" } else { "places" };
                insights.push(
                    Insight::new(
                        InsightType::Ranking,
                        format!(
                            "{}: {} {} {} in the {} ranking",
                            country, verb, places, noun, latest
                        ),
                        format!(
                            "{} went from rank {} in {} to rank {} in {} (ascending by {}).",
                            country,
                            rank_previous,
                            latest - 1,
                            rank_latest,
                            latest,
                            indicator
                        ),
                    )
                    .with_country(country.clone())
                    .with_year(latest)
                    .with_evidence("rank_change", rank_change as f64)
                    .with_evidence("rank_latest", rank_latest as f64),
                );
            }
        }

        insights
    }
}
