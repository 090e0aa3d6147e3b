//! Domain models: observations, indicator polarity, and the filter context

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::insights::InsightType;

/// A single tidy-panel observation.
///
/// For a given (country, year, indicator) tuple there is at most one
/// observation. A missing value is an absent row, never a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub indicator: String,
    pub value: f64,
}

impl Observation {
    pub fn new(
        country: impl Into<String>,
        year: i32,
        indicator: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            country: country.into(),
            year,
            indicator: indicator.into(),
            value,
        }
    }
}

/// Whether a lower or a higher indicator value is the desirable one.
///
/// Attached to the indicator at the data-provider boundary. The engine never
/// infers polarity from the indicator name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorPolarity {
    /// e.g. Gini index, poverty headcount
    LowerIsBetter,
    /// e.g. median income, HDI
    HigherIsBetter,
}

impl IndicatorPolarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorPolarity::LowerIsBetter => "lower_is_better",
            IndicatorPolarity::HigherIsBetter => "higher_is_better",
        }
    }
}

impl fmt::Display for IndicatorPolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IndicatorPolarity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lower_is_better" => Ok(IndicatorPolarity::LowerIsBetter),
            "higher_is_better" => Ok(IndicatorPolarity::HigherIsBetter),
            _ => Err(format!("Unknown indicator polarity: {}", s)),
        }
    }
}

/// User-selected filters for one engine invocation. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterContext {
    /// Countries to analyze (non-empty)
    pub countries: BTreeSet<String>,
    /// Indicator code, e.g. "gini"
    pub indicator: String,
    /// Polarity of the indicator, supplied by the data provider
    pub polarity: IndicatorPolarity,
    /// Inclusive year range (min, max)
    pub year_range: (i32, i32),
    /// Insight types to generate; a disabled type contributes zero insights
    pub enabled_types: BTreeSet<InsightType>,
    /// Maximum number of ranked insights to return (> 0)
    pub max_insights: usize,
    /// Restrict analysis to the most data-complete countries
    pub focus_mode: bool,
}

impl FilterContext {
    /// Build a context with all insight types enabled.
    pub fn new(
        countries: BTreeSet<String>,
        indicator: impl Into<String>,
        polarity: IndicatorPolarity,
        year_range: (i32, i32),
        max_insights: usize,
    ) -> Self {
        Self {
            countries,
            indicator: indicator.into(),
            polarity,
            year_range,
            enabled_types: InsightType::all().iter().copied().collect(),
            max_insights,
            focus_mode: false,
        }
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = InsightType>) -> Self {
        self.enabled_types = types.into_iter().collect();
        self
    }

    pub fn with_focus_mode(mut self, focus: bool) -> Self {
        self.focus_mode = focus;
        self
    }

    /// Number of years in the inclusive range.
    pub fn year_span(&self) -> usize {
        (self.year_range.1 - self.year_range.0 + 1) as usize
    }

    /// Fail fast on malformed contexts before any generator runs.
    pub fn validate(&self) -> Result<()> {
        if self.countries.is_empty() {
            return Err(Error::InvalidFilter("countries must be non-empty".into()));
        }
        if self.indicator.is_empty() {
            return Err(Error::InvalidFilter("indicator must be non-empty".into()));
        }
        if self.year_range.0 > self.year_range.1 {
            return Err(Error::InvalidFilter(format!(
                "year range start {} is after end {}",
                self.year_range.0, self.year_range.1
            )));
        }
        if self.max_insights == 0 {
            return Err(Error::InvalidFilter("max_insights must be > 0".into()));
        }
        Ok(())
    }
}
