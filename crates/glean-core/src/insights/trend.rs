//! Trend insights
//!
//! Fits an ordinary least-squares regression of value on year for every
//! country with enough observations, plus one regional trend over the
//! per-year cross-country mean series.

use tracing::debug;

use crate::stats::{linear_fit, LinearFit};

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightType};

/// Generator for per-country and regional regression trends
pub struct TrendGenerator {
    /// Minimum yearly observations per country (default 3)
    min_observations: usize,
}

impl TrendGenerator {
    pub fn new() -> Self {
        Self {
            min_observations: 3,
        }
    }

    pub fn with_min_observations(min_observations: usize) -> Self {
        Self { min_observations }
    }

    /// Build one trend insight from a fitted series.
    ///
    /// Returns `None` when the series starts at zero (relative change is
    /// undefined) or the fitted slope carries no direction.
    fn trend_insight(
        &self,
        subject: &str,
        country: Option<&str>,
        indicator: &str,
        series: &[(i32, f64)],
        fit: &LinearFit,
        completeness_pct: f64,
    ) -> Option<Insight> {
        let (first_year, first_value) = series[0];
        let (last_year, last_value) = *series.last().expect("series is non-empty");
        if first_value == 0.0 {
            return None;
        }
        let change_relative = (last_value - first_value) / first_value * 100.0;

        let direction = if fit.slope > 0.0 {
            "increasing"
        } else if fit.slope < 0.0 {
            "decreasing"
        } else {
            return None;
        };

        let title = format!(
            "{}: {} {} {:.1}% ({}-{})",
            subject,
            indicator,
            direction,
            change_relative.abs(),
            first_year,
            last_year
        );
        let narrative = format!(
            "{} moved from {:.2} in {} to {:.2} in {}, a {:.1}% change. \
             The linear fit explains {:.0}% of the year-to-year variance.",
            indicator,
            first_value,
            first_year,
            last_value,
            last_year,
            change_relative,
            fit.r_squared * 100.0
        );

        let mut insight = Insight::new(InsightType::Trend, title, narrative)
            .with_year(last_year)
            .with_evidence("p_value", fit.p_value)
            .with_evidence("r_squared", fit.r_squared)
            .with_evidence("change_relative", change_relative)
            .with_evidence("slope", fit.slope)
            .with_evidence("completeness_pct", completeness_pct);
        if let Some(c) = country {
            insight = insight.with_country(c);
        }
        Some(insight)
    }
}

impl Default for TrendGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator for TrendGenerator {
    fn name(&self) -> &'static str {
        "Trend"
    }

    fn provides(&self) -> &'static [InsightType] {
        &[InsightType::Trend]
    }

    fn generate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();
        let indicator = &ctx.filter.indicator;

        let countries = ctx.panel.countries();
        for country in &countries {
            let series = ctx.panel.series(country);
            if series.len() < self.min_observations {
                debug!(country, points = series.len(), "too few points for a trend");
                continue;
            }

            let x: Vec<f64> = series.iter().map(|(year, _)| *year as f64).collect();
            let y: Vec<f64> = series.iter().map(|(_, value)| *value).collect();
            let Some(fit) = linear_fit(&x, &y) else {
                debug!(country, "series has no variance, skipping trend");
                continue;
            };

            let completeness = ctx.panel.completeness(country, ctx.filter.year_range);
            if let Some(insight) =
                self.trend_insight(country, Some(country), indicator, &series, &fit, completeness)
            {
                insights.push(insight);
            }
        }

        // Regional trend over the per-year cross-country mean. Pointless for
        // a single country, where it would duplicate that country's trend.
        if countries.len() >= 2 {
            let means = ctx.panel.yearly_means();
            if means.len() >= self.min_observations {
                let x: Vec<f64> = means.iter().map(|(year, _)| *year as f64).collect();
                let y: Vec<f64> = means.iter().map(|(_, value)| *value).collect();
                if let Some(fit) = linear_fit(&x, &y) {
                    let overall = ctx.panel.overall_completeness(ctx.filter.year_range);
                    if let Some(insight) = self.trend_insight(
                        "Regional average",
                        None,
                        indicator,
                        &means,
                        &fit,
                        overall,
                    ) {
                        insights.push(insight);
                    }
                }
            }
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
        TrendGenerator::new().generate(&ctx)
    }

    #[test]
    fn test_perfect_upward_trend() {
        let observations = vec![
            Observation::new("CountryA", 2015, "gini", 30.0),
            Observation::new("CountryA", 2016, "gini", 32.0),
            Observation::new("CountryA", 2017, "gini", 34.0),
            Observation::new("CountryA", 2018, "gini", 36.0),
        ];
        let insights = run(&observations, &filter(&["CountryA"], (2015, 2018)));

        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.insight_type, InsightType::Trend);
        assert_eq!(insight.country.as_deref(), Some("CountryA"));
        assert_eq!(insight.primary_year, Some(2018));
        assert!(insight.title.contains("increasing"));
        assert!((insight.evidence_value("r_squared").unwrap() - 1.0).abs() < 1e-9);
        assert!((insight.evidence_value("change_relative").unwrap() - 20.0).abs() < 1e-9);
        assert!(insight.evidence_value("p_value").unwrap() < 0.05);
        assert_eq!(insight.evidence_value("completeness_pct"), Some(100.0));
    }

    #[test]
    fn test_too_few_points_skipped() {
        let observations = vec![
            Observation::new("CountryA", 2015, "gini", 30.0),
            Observation::new("CountryA", 2016, "gini", 32.0),
        ];
        assert!(run(&observations, &filter(&["CountryA"], (2015, 2018))).is_empty());
    }

    #[test]
    fn test_first_value_zero_skipped() {
        let observations = vec![
            Observation::new("CountryA", 2015, "gini", 0.0),
            Observation::new("CountryA", 2016, "gini", 2.0),
            Observation::new("CountryA", 2017, "gini", 4.0),
        ];
        assert!(run(&observations, &filter(&["CountryA"], (2015, 2017))).is_empty());
    }

    #[test]
    fn test_constant_series_skipped() {
        let observations = vec![
            Observation::new("CountryA", 2015, "gini", 30.0),
            Observation::new("CountryA", 2016, "gini", 30.0),
            Observation::new("CountryA", 2017, "gini", 30.0),
        ];
        assert!(run(&observations, &filter(&["CountryA"], (2015, 2017))).is_empty());
    }

    #[test]
    fn test_regional_trend_for_multiple_countries() {
        let observations = vec![
            Observation::new("CountryA", 2015, "gini", 30.0),
            Observation::new("CountryA", 2016, "gini", 32.0),
            Observation::new("CountryA", 2017, "gini", 34.0),
            Observation::new("CountryB", 2015, "gini", 40.0),
            Observation::new("CountryB", 2016, "gini", 38.0),
            Observation::new("CountryB", 2017, "gini", 37.0),
        ];
        let insights = run(&observations, &filter(&["CountryA", "CountryB"], (2015, 2017)));

        // one per country plus a regional one
        assert_eq!(insights.len(), 3);
        let regional = insights.iter().find(|i| i.country.is_none()).unwrap();
        assert!(regional.title.starts_with("Regional average"));
        // means: 35.0, 35.0, 35.5 -> slight upward slope
        assert!(regional.evidence_value("slope").unwrap() > 0.0);
    }

    #[test]
    fn test_downward_trend_direction() {
        let observations = vec![
            Observation::new("CountryB", 2015, "gini", 40.0),
            Observation::new("CountryB", 2016, "gini", 36.0),
            Observation::new("CountryB", 2017, "gini", 31.0),
        ];
        let insights = run(&observations, &filter(&["CountryB"], (2015, 2017)));
        assert_eq!(insights.len(), 1);
        assert!(insights[0].title.contains("decreasing"));
        assert!(insights[0].evidence_value("change_relative").unwrap() < 0.0);
    }
}
