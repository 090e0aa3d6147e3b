//! Glean Core Library
//!
//! Shared functionality for the Glean panel-data insight engine:
//! - Tidy panel model (country x year x indicator observations)
//! - Filter context with validation and focus-mode pre-filtering
//! - Insight engine with pluggable generators (trend, ranking, anomaly, ...)
//! - Central additive scorer with configurable thresholds
//! - Deterministic text/CSV report formatting
//! - CSV panel ingestion

pub mod error;
pub mod ingest;
pub mod insights;
pub mod models;
pub mod panel;
pub mod report;
pub mod stats;

pub use error::{Error, Result};
pub use insights::{
    Insight, InsightEngine, InsightType, PriorityLabel, RankedResult, ResultMetadata,
    ScoringConfig,
};
pub use models::{FilterContext, IndicatorPolarity, Observation};
pub use panel::Panel;
pub use report::{
    format_insights_as_json, format_insights_as_text, write_insights_csv, InsightRow,
};
