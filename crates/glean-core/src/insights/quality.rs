//! Data quality insights
//!
//! Surfaces coverage caveats: countries with sparse observations over the
//! requested range, and a panel-wide note when coverage is strong.

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightType};

/// Generator for data coverage caveats
pub struct QualityGenerator {
    /// Completeness below which a country gets a sparse-data caveat (default 50%)
    sparse_threshold_pct: f64,
    /// Overall completeness at or above which coverage counts as strong (default 80%)
    coverage_threshold_pct: f64,
}

impl QualityGenerator {
    pub fn new() -> Self {
        Self {
            sparse_threshold_pct: 50.0,
            coverage_threshold_pct: 80.0,
        }
    }

    pub fn with_thresholds(sparse_threshold_pct: f64, coverage_threshold_pct: f64) -> Self {
        Self {
            sparse_threshold_pct,
            coverage_threshold_pct,
        }
    }
}

impl Default for QualityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator for QualityGenerator {
    fn name(&self) -> &'static str {
        "Quality"
    }

    fn provides(&self) -> &'static [InsightType] {
        &[InsightType::Quality]
    }

    fn generate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();
        let span = ctx.filter.year_span();
        let (min_year, max_year) = ctx.filter.year_range;

        for country in ctx.panel.countries() {
            let completeness = ctx.panel.completeness(&country, ctx.filter.year_range);
            if completeness >= self.sparse_threshold_pct {
                continue;
            }
            let observed = ctx.panel.series(&country).len();
            insights.push(
                Insight::new(
                    InsightType::Quality,
                    format!("{}: sparse data coverage", country),
                    format!(
                        "Only {} of {} years between {} and {} carry an observation \
                         ({:.0}% coverage); findings for {} rest on thin evidence.",
                        observed, span, min_year, max_year, completeness, country
                    ),
                )
                .with_country(country)
                .with_evidence("completeness_pct", completeness),
            );
        }

        let overall = ctx.panel.overall_completeness(ctx.filter.year_range);
        if overall >= self.coverage_threshold_pct {
            insights.push(
                Insight::new(
                    InsightType::Quality,
                    "Strong data coverage across the selection".to_string(),
                    format!(
                        "{:.0}% of the country-year cells between {} and {} carry an \
                         observation.",
                        overall, min_year, max_year
                    ),
                )
                .with_evidence("completeness_pct", overall),
            );
        }

        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterContext, IndicatorPolarity, Observation};
    use crate::panel::Panel;
    use std::collections::BTreeSet;

    fn filter(names: &[&str], range: (i32, i32)) -> FilterContext {
        let countries: BTreeSet<String> = names.iter().map(|s| s.to_string()).collect();
        FilterContext::new(countries, "gini", IndicatorPolarity::LowerIsBetter, range, 10)
    }

    fn run(observations: &[Observation], filter: &FilterContext) -> Vec<Insight> {
        let panel = Panel::prepare(observations, filter);
        let ctx = AnalysisContext {
            latest_year: panel.latest_year(),
            panel: &panel,
            filter,
        };
        QualityGenerator::new().generate(&ctx)
    }

    #[test]
    fn test_sparse_country_flagged() {
        // Nepal: 1 of 4 years (25%), India: 4 of 4
        let observations = vec![
            Observation::new("India", 2017, "gini", 35.0),
            Observation::new("India", 2018, "gini", 35.2),
            Observation::new("India", 2019, "gini", 35.4),
            Observation::new("India", 2020, "gini", 35.6),
            Observation::new("Nepal", 2020, "gini", 32.0),
        ];
        let insights = run(&observations, &filter(&["India", "Nepal"], (2017, 2020)));

        let sparse: Vec<_> = insights
            .iter()
            .filter(|i| i.title.contains("sparse"))
            .collect();
        assert_eq!(sparse.len(), 1);
        assert_eq!(sparse[0].country.as_deref(), Some("Nepal"));
        assert_eq!(sparse[0].evidence_value("completeness_pct"), Some(25.0));
    }

    #[test]
    fn test_strong_coverage_noted() {
        let mut observations = Vec::new();
        for year in 2017..=2020 {
            observations.push(Observation::new("India", year, "gini", 35.0));
            observations.push(Observation::new("Nepal", year, "gini", 32.0));
        }
        let insights = run(&observations, &filter(&["India", "Nepal"], (2017, 2020)));
        assert!(insights.iter().any(|i| i.title.contains("Strong data coverage")));
    }

    #[test]
    fn test_patchy_panel_gets_no_coverage_note() {
        let observations = vec![
            Observation::new("India", 2017, "gini", 35.0),
            Observation::new("Nepal", 2020, "gini", 32.0),
        ];
        let insights = run(&observations, &filter(&["India", "Nepal"], (2017, 2020)));
        assert!(!insights.iter().any(|i| i.title.contains("Strong")));
        assert_eq!(insights.len(), 2); // both countries sparse
    }
}
