//! Core types for the insight engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Types of insights that can be generated
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Per-country and regional regression trends
    Trend,
    /// Latest-year ranking and rank shifts
    Ranking,
    /// Deviation from the cross-country average
    Comparison,
    /// Outlier years within a country's own series
    Anomaly,
    /// Cross-country distribution statistics
    Statistics,
    /// Data coverage caveats
    Quality,
    /// Naive linear extrapolation to the next year
    Forecast,
    /// Concentration of the latest-year total
    Pareto,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Trend => "trend",
            InsightType::Ranking => "ranking",
            InsightType::Comparison => "comparison",
            InsightType::Anomaly => "anomaly",
            InsightType::Statistics => "statistics",
            InsightType::Quality => "quality",
            InsightType::Forecast => "forecast",
            InsightType::Pareto => "pareto",
        }
    }

    /// Numeric priority for tie-breaking (higher wins).
    ///
    /// Fixed order: Anomaly > Trend > Ranking > Comparison > Statistics >
    /// Quality > Forecast > Pareto.
    pub fn priority(&self) -> u8 {
        match self {
            InsightType::Anomaly => 8,
            InsightType::Trend => 7,
            InsightType::Ranking => 6,
            InsightType::Comparison => 5,
            InsightType::Statistics => 4,
            InsightType::Quality => 3,
            InsightType::Forecast => 2,
            InsightType::Pareto => 1,
        }
    }

    /// All insight types, in declaration order.
    pub fn all() -> &'static [InsightType] {
        &[
            InsightType::Trend,
            InsightType::Ranking,
            InsightType::Comparison,
            InsightType::Anomaly,
            InsightType::Statistics,
            InsightType::Quality,
            InsightType::Forecast,
            InsightType::Pareto,
        ]
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trend" => Ok(InsightType::Trend),
            "ranking" => Ok(InsightType::Ranking),
            "comparison" => Ok(InsightType::Comparison),
            "anomaly" => Ok(InsightType::Anomaly),
            "statistics" => Ok(InsightType::Statistics),
            "quality" => Ok(InsightType::Quality),
            "forecast" => Ok(InsightType::Forecast),
            "pareto" => Ok(InsightType::Pareto),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Priority label derived from the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLabel {
    Critical,
    Important,
    Notable,
}

impl PriorityLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 15.0 {
            PriorityLabel::Critical
        } else if score >= 8.0 {
            PriorityLabel::Important
        } else {
            PriorityLabel::Notable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLabel::Critical => "CRITICAL",
            PriorityLabel::Important => "IMPORTANT",
            PriorityLabel::Notable => "NOTABLE",
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single scored finding about the panel.
///
/// Created by exactly one generator call, scored once by the central scorer,
/// and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Type of insight that generated this finding
    pub insight_type: InsightType,
    /// Subject country; `None` for regional/panel-wide findings
    pub country: Option<String>,
    /// The year this finding is anchored to, if any
    pub primary_year: Option<i32>,
    /// Short headline (e.g. "India: gini increasing 12.3% over 2010-2020")
    pub title: String,
    /// One-paragraph narrative with the supporting numbers
    pub narrative: String,
    /// Importance in [0, 25], assigned by the central scorer
    pub score: f64,
    /// Numeric evidence backing the finding (p_value, z_score, ...)
    pub evidence: BTreeMap<String, f64>,
}

impl Insight {
    /// Create a new insight with an unset score.
    pub fn new(
        insight_type: InsightType,
        title: impl Into<String>,
        narrative: impl Into<String>,
    ) -> Self {
        Self {
            insight_type,
            country: None,
            primary_year: None,
            title: title.into(),
            narrative: narrative.into(),
            score: 0.0,
            evidence: BTreeMap::new(),
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.primary_year = Some(year);
        self
    }

    /// Attach a numeric evidence field. Non-finite values are dropped so the
    /// scorer and formatter only ever see real numbers.
    pub fn with_evidence(mut self, key: &str, value: f64) -> Self {
        if value.is_finite() {
            self.evidence.insert(key.to_string(), value);
        }
        self
    }

    pub fn evidence_value(&self, key: &str) -> Option<f64> {
        self.evidence.get(key).copied()
    }

    pub fn priority_label(&self) -> PriorityLabel {
        PriorityLabel::from_score(self.score)
    }

    /// Country key for deterministic ordering; regional findings sort first.
    pub(crate) fn country_key(&self) -> &str {
        self.country.as_deref().unwrap_or("")
    }
}

/// Metadata describing one engine invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Deduplicated insight count before truncation
    pub total_generated: usize,
    /// Length of `ranked_insights`
    pub total_shown: usize,
    /// Countries actually analyzed (post focus-mode)
    pub countries_analyzed: Vec<String>,
    pub indicator: String,
    pub year_range: (i32, i32),
    pub focus_mode: bool,
    pub enabled_types: Vec<InsightType>,
}

/// The ranked, deduplicated output of one engine invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// Descending by score, deterministic tie-break
    pub ranked_insights: Vec<Insight>,
    pub metadata: ResultMetadata,
}
