//! Pareto insights
//!
//! Measures how much of the latest-year total is held by the top quarter of
//! countries. Only meaningful for positive, summable indicators (income
//! shares, population counts), so negative or zero values disable it.

use tracing::debug;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightType};

/// Generator for latest-year concentration findings
pub struct ParetoGenerator {
    /// Share of the total (percent) above which concentration is reported (default 40)
    share_threshold_pct: f64,
    /// Minimum countries so the top quarter is a proper subset (default 4)
    min_countries: usize,
}

impl ParetoGenerator {
    pub fn new() -> Self {
        Self {
            share_threshold_pct: 40.0,
            min_countries: 4,
        }
    }

    pub fn with_thresholds(share_threshold_pct: f64, min_countries: usize) -> Self {
        Self {
            share_threshold_pct,
            min_countries,
        }
    }
}

impl Default for ParetoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator for ParetoGenerator {
    fn name(&self) -> &'static str {
        "Pareto"
    }

    fn provides(&self) -> &'static [InsightType] {
        &[InsightType::Pareto]
    }

    fn generate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let Some(latest) = ctx.latest_year else {
            return vec![];
        };
        let current = ctx.panel.values_in_year(latest);
        if current.len() < self.min_countries {
            return vec![];
        }
        if current.iter().any(|(_, v)| *v <= 0.0) {
            debug!(year = latest, "non-positive values, concentration undefined");
            return vec![];
        }

        let total: f64 = current.iter().map(|(_, v)| *v).sum();
        let top_k = (current.len() / 4).max(1);

        let mut sorted = current.clone();
        sorted.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        let top_sum: f64 = sorted.iter().take(top_k).map(|(_, v)| *v).sum();
        let top_share = top_sum / total * 100.0;
        if top_share <= self.share_threshold_pct {
            return vec![];
        }

        let top_names: Vec<&str> = sorted.iter().take(top_k).map(|(c, _)| c.as_str()).collect();
        let noun = if top_k == 1 { "country" } else { "countries" };
        vec![Insight::new(
            InsightType::Pareto,
            format!(
                "Top {} {} hold {:.0}% of the {} total in {}",
                top_k, noun, top_share, ctx.filter.indicator, latest
            ),
            format!(
                "{} account for {:.1}% of the combined {} across all {} selected \
                 countries.",
                top_names.join(", "),
                top_share,
                ctx.filter.indicator,
                current.len()
            ),
        )
        .with_year(latest)
        .with_evidence("top_share_pct", top_share)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterContext, IndicatorPolarity, Observation};
    use crate::panel::Panel;
    use std::collections::BTreeSet;

    fn filter(names: &[&str]) -> FilterContext {
        let countries: BTreeSet<String> = names.iter().map(|s| s.to_string()).collect();
        FilterContext::new(
            countries,
            "income_share_top10",
            IndicatorPolarity::LowerIsBetter,
            (2020, 2020),
            10,
        )
    }

    fn run(observations: &[Observation], filter: &FilterContext) -> Vec<Insight> {
        let panel = Panel::prepare(observations, filter);
        let ctx = AnalysisContext {
            latest_year: panel.latest_year(),
            panel: &panel,
            filter,
        };
        ParetoGenerator::new().generate(&ctx)
    }

    fn obs(country: &str, value: f64) -> Observation {
        Observation::new(country, 2020, "income_share_top10", value)
    }

    #[test]
    fn test_concentrated_total_reported() {
        // top quarter (1 of 4) holds 70/100
        let observations = vec![
            obs("India", 70.0),
            obs("Nepal", 12.0),
            obs("Bhutan", 10.0),
            obs("Maldives", 8.0),
        ];
        let names = ["Bhutan", "India", "Maldives", "Nepal"];
        let insights = run(&observations, &filter(&names));

        assert_eq!(insights.len(), 1);
        assert!((insights[0].evidence_value("top_share_pct").unwrap() - 70.0).abs() < 1e-9);
        assert!(insights[0].narrative.starts_with("India"));
    }

    #[test]
    fn test_even_spread_not_reported() {
        let observations = vec![
            obs("India", 25.0),
            obs("Nepal", 25.0),
            obs("Bhutan", 25.0),
            obs("Maldives", 25.0),
        ];
        let names = ["Bhutan", "India", "Maldives", "Nepal"];
        assert!(run(&observations, &filter(&names)).is_empty());
    }

    #[test]
    fn test_negative_values_disable_generator() {
        let observations = vec![
            obs("India", 70.0),
            obs("Nepal", -12.0),
            obs("Bhutan", 10.0),
            obs("Maldives", 8.0),
        ];
        let names = ["Bhutan", "India", "Maldives", "Nepal"];
        assert!(run(&observations, &filter(&names)).is_empty());
    }

    #[test]
    fn test_too_few_countries_skipped() {
        let observations = vec![obs("India", 70.0), obs("Nepal", 12.0), obs("Bhutan", 10.0)];
        let names = ["Bhutan", "India", "Nepal"];
        assert!(run(&observations, &filter(&names)).is_empty());
    }
}
