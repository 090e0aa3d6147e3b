//! Insight engine - orchestrates generation, scoring, and ranking
//!
//! The engine is a pure function of (observations, filter): no I/O, no
//! randomness, no state carried between invocations. Output order is fully
//! deterministic, so identical inputs produce byte-identical results.

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{FilterContext, Observation};
use crate::panel::Panel;

use super::scoring::ScoringConfig;
use super::types::{Insight, InsightType, RankedResult, ResultMetadata};
use super::{
    AnomalyGenerator, ForecastGenerator, ParetoGenerator, QualityGenerator, RankingGenerator,
    StatisticsGenerator, TrendGenerator,
};

/// Context handed to insight generators
pub struct AnalysisContext<'a> {
    /// Prepared panel (filtered, sorted, focus-mode applied)
    pub panel: &'a Panel,
    /// The filter context for this invocation
    pub filter: &'a FilterContext,
    /// Latest year present in the prepared panel
    pub latest_year: Option<i32>,
}

/// Trait for insight generators
pub trait InsightGenerator: Send + Sync {
    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Insight types this generator can emit
    fn provides(&self) -> &'static [InsightType];

    /// Scan the panel and produce unscored insights.
    ///
    /// Generators are total: insufficient data for a candidate skips that
    /// candidate only, it never fails the run.
    fn generate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// The main insight engine
pub struct InsightEngine {
    generators: Vec<Box<dyn InsightGenerator>>,
    scoring: ScoringConfig,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in generators and default scoring.
    pub fn new() -> Self {
        Self::with_scoring(ScoringConfig::default())
    }

    /// Create an engine with custom scoring thresholds.
    pub fn with_scoring(scoring: ScoringConfig) -> Self {
        let mut engine = Self {
            generators: vec![],
            scoring,
        };

        // Registration order is the generation order used for tie-breaking.
        engine.register(Box::new(TrendGenerator::new()));
        engine.register(Box::new(RankingGenerator::new()));
        engine.register(Box::new(AnomalyGenerator::new()));
        engine.register(Box::new(StatisticsGenerator::new()));
        engine.register(Box::new(QualityGenerator::new()));
        engine.register(Box::new(ForecastGenerator::new()));
        engine.register(Box::new(ParetoGenerator::new()));

        engine
    }

    /// Register an additional generator.
    pub fn register(&mut self, generator: Box<dyn InsightGenerator>) {
        self.generators.push(generator);
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Run all enabled generators and produce the ranked, deduplicated list.
    ///
    /// An empty filtered panel yields an empty result, not an error;
    /// a malformed filter context fails fast before any generator runs.
    pub fn generate_ranked_insights(
        &self,
        observations: &[Observation],
        filter: &FilterContext,
    ) -> Result<RankedResult> {
        filter.validate()?;

        let panel = Panel::prepare(observations, filter);
        if panel.is_empty() {
            tracing::debug!(
                indicator = filter.indicator,
                "filtered panel is empty, returning no insights"
            );
            return Ok(RankedResult {
                ranked_insights: vec![],
                metadata: self.metadata(filter, &panel, 0, 0),
            });
        }

        let ctx = AnalysisContext {
            panel: &panel,
            filter,
            latest_year: panel.latest_year(),
        };

        let mut collected: Vec<Insight> = Vec::new();
        for generator in &self.generators {
            let enabled = generator
                .provides()
                .iter()
                .any(|ty| filter.enabled_types.contains(ty));
            if !enabled {
                continue;
            }

            let mut insights = generator.generate(&ctx);
            insights.retain(|i| filter.enabled_types.contains(&i.insight_type));
            tracing::debug!(
                generator = generator.name(),
                count = insights.len(),
                "generator complete"
            );

            for mut insight in insights {
                insight.score = self.scoring.score(&insight, ctx.latest_year);
                collected.push(insight);
            }
        }

        // Deduplicate by (type, title), keeping the higher-scored instance.
        // The survivor retains the earlier generation position, which keeps
        // the final tie-break stable.
        let mut deduped: Vec<Insight> = Vec::with_capacity(collected.len());
        let mut seen: HashMap<(InsightType, String), usize> = HashMap::new();
        for insight in collected {
            let key = (insight.insight_type, insight.title.clone());
            match seen.get(&key) {
                Some(&idx) => {
                    if insight.score > deduped[idx].score {
                        deduped[idx] = insight;
                    }
                }
                None => {
                    seen.insert(key, deduped.len());
                    deduped.push(insight);
                }
            }
        }

        let total_generated = deduped.len();

        // Score descending; ties by type priority, then country name, then
        // generation order (the sort is stable).
        deduped.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.insight_type.priority().cmp(&a.insight_type.priority()))
                .then_with(|| a.country_key().cmp(b.country_key()))
        });
        deduped.truncate(filter.max_insights);

        let total_shown = deduped.len();
        tracing::debug!(total_generated, total_shown, "insight run complete");

        Ok(RankedResult {
            metadata: self.metadata(filter, &panel, total_generated, total_shown),
            ranked_insights: deduped,
        })
    }

    fn metadata(
        &self,
        filter: &FilterContext,
        panel: &Panel,
        total_generated: usize,
        total_shown: usize,
    ) -> ResultMetadata {
        ResultMetadata {
            total_generated,
            total_shown,
            countries_analyzed: panel.countries(),
            indicator: filter.indicator.clone(),
            year_range: filter.year_range,
            focus_mode: filter.focus_mode,
            enabled_types: filter.enabled_types.iter().copied().collect(),
        }
    }

    /// Names of the registered generators, in registration order.
    pub fn generator_names(&self) -> Vec<&'static str> {
        self.generators.iter().map(|g| g.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndicatorPolarity;
    use std::collections::BTreeSet;

    fn filter(names: &[&str], range: (i32, i32)) -> FilterContext {
        let countries: BTreeSet<String> = names.iter().map(|s| s.to_string()).collect();
        FilterContext::new(countries, "gini", IndicatorPolarity::LowerIsBetter, range, 10)
    }

    #[test]
    fn test_engine_registers_builtins() {
        let engine = InsightEngine::new();
        let names = engine.generator_names();
        assert_eq!(names.len(), 7);
        assert_eq!(names[0], "Trend");
        assert_eq!(names[2], "Anomaly");
    }

    #[test]
    fn test_invalid_filter_fails_fast() {
        let engine = InsightEngine::new();
        let mut ctx = filter(&["India"], (2010, 2020));
        ctx.max_insights = 0;
        assert!(engine.generate_ranked_insights(&[], &ctx).is_err());
    }

    #[test]
    fn test_empty_panel_yields_empty_result() {
        let engine = InsightEngine::new();
        let result = engine
            .generate_ranked_insights(&[], &filter(&["India"], (2010, 2020)))
            .unwrap();
        assert!(result.ranked_insights.is_empty());
        assert_eq!(result.metadata.total_generated, 0);
        assert_eq!(result.metadata.total_shown, 0);
    }
}
