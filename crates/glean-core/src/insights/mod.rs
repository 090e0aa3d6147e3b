//! Insight Engine - Ranked Findings over a Tidy Panel
//!
//! The Insight Engine is a pluggable system that scans a filtered
//! country x year x indicator panel and surfaces what is interesting:
//! trends, rankings, anomalies, distribution statistics, and a few
//! supplemental families. Instead of waiting for users to ask the right
//! questions, every run produces a ranked, deduplicated list of scored
//! findings.
//!
//! ## Insight Types
//!
//! - **Trend** - Per-country and regional regression trends
//! - **Ranking** - Latest-year best/worst performers and rank shifts
//! - **Comparison** - Deviation from the cross-country average
//! - **Anomaly** - Outlier years within a country's own series
//! - **Statistics** - Cross-country distribution of the latest year
//! - **Quality** - Data coverage caveats
//! - **Forecast** - Naive linear extrapolation to the next year
//! - **Pareto** - Concentration of the latest-year total
//!
//! ## Usage
//!
//! ```rust,ignore
//! use glean_core::{FilterContext, InsightEngine};
//!
//! let engine = InsightEngine::new();
//! let result = engine.generate_ranked_insights(&observations, &filter)?;
//! ```

pub mod anomaly;
pub mod engine;
pub mod forecast;
pub mod pareto;
pub mod quality;
pub mod ranking;
pub mod scoring;
pub mod statistics;
pub mod trend;
pub mod types;

pub use anomaly::AnomalyGenerator;
pub use engine::{AnalysisContext, InsightEngine, InsightGenerator};
pub use forecast::ForecastGenerator;
pub use pareto::ParetoGenerator;
pub use quality::QualityGenerator;
pub use ranking::RankingGenerator;
pub use scoring::ScoringConfig;
pub use statistics::StatisticsGenerator;
pub use trend::TrendGenerator;
pub use types::{Insight, InsightType, PriorityLabel, RankedResult, ResultMetadata};
