//! Deterministic report formatting
//!
//! The text report and the CSV projection are pure functions of a
//! `RankedResult`: identical input yields byte-identical output, which is
//! what the golden-file tests pin down. Evidence values print with fixed
//! precision (p-values 4 decimals, r-squared 3, everything else 2) and the
//! evidence map iterates in key order.

use std::fmt::Write as _;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::insights::{Insight, RankedResult};

fn format_evidence(key: &str, value: f64) -> String {
    match key {
        "p_value" => format!("{}={:.4}", key, value),
        "r_squared" => format!("{}={:.3}", key, value),
        _ => format!("{}={:.2}", key, value),
    }
}

/// Render a ranked result as a plain-text report.
///
/// Never fails, including for the empty result, which gets a placeholder
/// block instead of insight entries.
pub fn format_insights_as_text(result: &RankedResult) -> String {
    let meta = &result.metadata;
    let mut out = String::new();

    out.push_str("=== Insight Report ===\n");
    let _ = writeln!(out, "Indicator:  {}", meta.indicator);
    let _ = writeln!(out, "Years:      {}-{}", meta.year_range.0, meta.year_range.1);
    let _ = writeln!(out, "Countries:  {}", meta.countries_analyzed.join(", "));
    let _ = writeln!(
        out,
        "Focus mode: {}",
        if meta.focus_mode { "on" } else { "off" }
    );
    let types: Vec<&str> = meta.enabled_types.iter().map(|t| t.as_str()).collect();
    let _ = writeln!(out, "Types:      {}", types.join(", "));
    let _ = writeln!(
        out,
        "Shown:      {} of {} generated",
        meta.total_shown, meta.total_generated
    );
    out.push('\n');

    if result.ranked_insights.is_empty() {
        out.push_str("No insights found for the current filters.\n");
        return out;
    }

    for (index, insight) in result.ranked_insights.iter().enumerate() {
        let _ = writeln!(
            out,
            "[{}] {} ({:.1}) {}",
            index + 1,
            insight.priority_label(),
            insight.score,
            insight.title
        );
        let _ = writeln!(out, "    {}", insight.narrative);
        if !insight.evidence.is_empty() {
            let fields: Vec<String> = insight
                .evidence
                .iter()
                .map(|(key, value)| format_evidence(key, *value))
                .collect();
            let _ = writeln!(out, "    evidence: {}", fields.join(", "));
        }
        out.push('\n');
    }

    out
}

/// One CSV row per ranked insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRow {
    pub priority_label: String,
    pub score: f64,
    pub title: String,
    pub narrative: String,
    pub insight_type: String,
    pub p_value: Option<f64>,
    pub r_squared: Option<f64>,
}

impl InsightRow {
    pub fn from_insight(insight: &Insight) -> Self {
        Self {
            priority_label: insight.priority_label().as_str().to_string(),
            score: insight.score,
            title: insight.title.clone(),
            narrative: insight.narrative.clone(),
            insight_type: insight.insight_type.as_str().to_string(),
            p_value: insight.evidence_value("p_value"),
            r_squared: insight.evidence_value("r_squared"),
        }
    }
}

/// Render a ranked result as pretty-printed JSON, newline-terminated.
pub fn format_insights_as_json(result: &RankedResult) -> Result<String> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    Ok(json)
}

/// Write the CSV projection of a ranked result.
pub fn write_insights_csv<W: Write>(result: &RankedResult, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for insight in &result.ranked_insights {
        wtr.serialize(InsightRow::from_insight(insight))?;
    }
    wtr.flush()?;
    Ok(())
}
