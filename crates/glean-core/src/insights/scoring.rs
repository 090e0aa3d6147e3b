//! Central additive scorer
//!
//! Every insight, regardless of generator, is scored here exactly once.
//! Thresholds are hand-tuned product constants, so they live in a config
//! struct that can be overridden from a TOML file rather than being baked
//! into the generators.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::insights::types::{Insight, InsightType};

/// Scoring thresholds and bonus weights.
///
/// The additive contributions (defaults in parentheses):
/// - significance: +5 when `p_value` < alpha (0.05)
/// - magnitude: +4 when `|change_relative|` > threshold (20%)
/// - anomaly: +4 for anomaly-typed insights
/// - data quality: +2 when `completeness_pct` > threshold (80%)
/// - model fit: +3 when `r_squared` > threshold (0.7)
/// - recency: +1 when the primary year is the latest panel year
///
/// The total is clamped to [0, max_score].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub significance_alpha: f64,
    pub magnitude_threshold_pct: f64,
    pub completeness_threshold_pct: f64,
    pub fit_threshold: f64,

    pub significance_bonus: f64,
    pub magnitude_bonus: f64,
    pub anomaly_bonus: f64,
    pub completeness_bonus: f64,
    pub fit_bonus: f64,
    pub recency_bonus: f64,

    pub max_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            significance_alpha: 0.05,
            magnitude_threshold_pct: 20.0,
            completeness_threshold_pct: 80.0,
            fit_threshold: 0.7,
            significance_bonus: 5.0,
            magnitude_bonus: 4.0,
            anomaly_bonus: 4.0,
            completeness_bonus: 2.0,
            fit_bonus: 3.0,
            recency_bonus: 1.0,
            max_score: 25.0,
        }
    }
}

impl ScoringConfig {
    /// Parse a config from TOML text. Missing fields fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.max_score <= 0.0 {
            return Err(Error::Config("max_score must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.significance_alpha) {
            return Err(Error::Config(
                "significance_alpha must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Compute the importance score for one insight.
    ///
    /// Each contribution applies only when the relevant evidence field is
    /// present (the builder already drops non-finite values).
    pub fn score(&self, insight: &Insight, latest_year: Option<i32>) -> f64 {
        let mut score = 0.0;

        if let Some(p) = insight.evidence_value("p_value") {
            if p < self.significance_alpha {
                score += self.significance_bonus;
            }
        }
        if let Some(change) = insight.evidence_value("change_relative") {
            if change.abs() > self.magnitude_threshold_pct {
                score += self.magnitude_bonus;
            }
        }
        if insight.insight_type == InsightType::Anomaly {
            score += self.anomaly_bonus;
        }
        if let Some(pct) = insight.evidence_value("completeness_pct") {
            if pct > self.completeness_threshold_pct {
                score += self.completeness_bonus;
            }
        }
        if let Some(r2) = insight.evidence_value("r_squared") {
            if r2 > self.fit_threshold {
                score += self.fit_bonus;
            }
        }
        if insight.primary_year.is_some() && insight.primary_year == latest_year {
            score += self.recency_bonus;
        }

        score.clamp(0.0, self.max_score)
    }
}
