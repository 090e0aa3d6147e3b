//! End-to-end tests for the insight engine

use std::collections::BTreeSet;

use glean_core::insights::{AnalysisContext, InsightGenerator};
use glean_core::{
    format_insights_as_text, FilterContext, IndicatorPolarity, Insight, InsightEngine,
    InsightType, Observation, ScoringConfig,
};

fn countries(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn gini_filter(names: &[&str], range: (i32, i32)) -> FilterContext {
    FilterContext::new(
        countries(names),
        "gini",
        IndicatorPolarity::LowerIsBetter,
        range,
        10,
    )
}

/// A multi-country panel with trends, an outlier, and uneven coverage.
fn sample_panel() -> Vec<Observation> {
    let mut panel = Vec::new();
    // India: steady rise 2010-2020
    for (i, year) in (2010..=2020).enumerate() {
        panel.push(Observation::new("India", year, "gini", 33.0 + i as f64 * 0.4));
    }
    // Nepal: flat-ish with a spike in 2015
    for year in 2010..=2020 {
        let value = if year == 2015 { 45.0 } else { 32.0 + ((year % 3) as f64) * 0.2 };
        panel.push(Observation::new("Nepal", year, "gini", value));
    }
    // Bhutan: declining, misses several years
    for (i, year) in [2010, 2012, 2014, 2016, 2018, 2020].iter().enumerate() {
        panel.push(Observation::new("Bhutan", *year, "gini", 40.0 - i as f64 * 0.9));
    }
    // Maldives: only two observations
    panel.push(Observation::new("Maldives", 2019, "gini", 29.0));
    panel.push(Observation::new("Maldives", 2020, "gini", 29.4));
    panel
}

fn all_countries() -> [&'static str; 4] {
    ["Bhutan", "India", "Maldives", "Nepal"]
}

#[test]
fn determinism_two_runs_identical() {
    let engine = InsightEngine::new();
    let panel = sample_panel();
    let filter = gini_filter(&all_countries(), (2010, 2020));

    let first = engine.generate_ranked_insights(&panel, &filter).unwrap();
    let second = engine.generate_ranked_insights(&panel, &filter).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        format_insights_as_text(&first),
        format_insights_as_text(&second)
    );
}

#[test]
fn truncation_and_counts() {
    let engine = InsightEngine::new();
    let panel = sample_panel();
    let mut filter = gini_filter(&all_countries(), (2010, 2020));
    filter.max_insights = 3;

    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();
    assert!(result.ranked_insights.len() <= 3);
    assert_eq!(result.metadata.total_shown, result.ranked_insights.len());
    assert!(result.metadata.total_generated >= result.metadata.total_shown);
}

#[test]
fn score_bounds_and_monotonic_order() {
    let engine = InsightEngine::new();
    let panel = sample_panel();
    let filter = gini_filter(&all_countries(), (2010, 2020));

    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();
    assert!(!result.ranked_insights.is_empty());
    for insight in &result.ranked_insights {
        assert!(insight.score >= 0.0 && insight.score <= 25.0);
    }
    for pair in result.ranked_insights.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn disabled_type_contributes_nothing() {
    let engine = InsightEngine::new();
    let panel = sample_panel();
    let enabled: Vec<InsightType> = InsightType::all()
        .iter()
        .copied()
        .filter(|t| *t != InsightType::Anomaly)
        .collect();
    let filter = gini_filter(&all_countries(), (2010, 2020)).with_types(enabled);

    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();
    assert!(result
        .ranked_insights
        .iter()
        .all(|i| i.insight_type != InsightType::Anomaly));

    // sanity: the same panel does produce an anomaly when enabled
    let filter = gini_filter(&all_countries(), (2010, 2020));
    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();
    assert!(result
        .ranked_insights
        .iter()
        .any(|i| i.insight_type == InsightType::Anomaly));
}

#[test]
fn empty_panel_scenario() {
    let engine = InsightEngine::new();
    let panel = sample_panel();
    // no matching indicator
    let filter = FilterContext::new(
        countries(&["India"]),
        "hdi",
        IndicatorPolarity::HigherIsBetter,
        (2010, 2020),
        10,
    );
    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();
    assert!(result.ranked_insights.is_empty());
    assert_eq!(result.metadata.total_generated, 0);
}

#[test]
fn trend_scenario_from_known_series() {
    let engine = InsightEngine::new();
    let panel = vec![
        Observation::new("CountryA", 2015, "gini", 30.0),
        Observation::new("CountryA", 2016, "gini", 32.0),
        Observation::new("CountryA", 2017, "gini", 34.0),
        Observation::new("CountryA", 2018, "gini", 36.0),
    ];
    let filter = gini_filter(&["CountryA"], (2015, 2018)).with_types([InsightType::Trend]);

    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();
    assert_eq!(result.ranked_insights.len(), 1);
    let insight = &result.ranked_insights[0];
    assert_eq!(insight.insight_type, InsightType::Trend);
    assert!((insight.evidence_value("r_squared").unwrap() - 1.0).abs() < 1e-6);
    assert!((insight.evidence_value("change_relative").unwrap() - 20.0).abs() < 1e-9);
    // perfect fit: significance +5, fit +3, completeness +2, recency +1
    assert!(insight.score >= 4.0);
}

#[test]
fn anomaly_scenario_from_known_series() {
    let engine = InsightEngine::new();
    let panel = vec![
        Observation::new("CountryB", 2014, "gini", 30.0),
        Observation::new("CountryB", 2015, "gini", 29.5),
        Observation::new("CountryB", 2016, "gini", 30.5),
        Observation::new("CountryB", 2017, "gini", 80.0),
        Observation::new("CountryB", 2018, "gini", 30.2),
        Observation::new("CountryB", 2019, "gini", 29.8),
    ];
    let filter = gini_filter(&["CountryB"], (2014, 2019)).with_types([InsightType::Anomaly]);

    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();
    assert_eq!(result.ranked_insights.len(), 1);
    let insight = &result.ranked_insights[0];
    assert_eq!(insight.insight_type, InsightType::Anomaly);
    assert_eq!(insight.primary_year, Some(2017));
    assert!(insight.evidence_value("z_score").unwrap().abs() > 2.0);
    // anomaly bonus guarantees a positive score
    assert!(insight.score >= 4.0);
}

#[test]
fn focus_mode_restricts_countries() {
    let engine = InsightEngine::new();
    let panel = sample_panel();
    let filter = gini_filter(&all_countries(), (2010, 2020)).with_focus_mode(true);

    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();
    // India and Nepal are fully covered, Bhutan has 6 of 11 years; the
    // two-observation Maldives series is cut.
    assert_eq!(
        result.metadata.countries_analyzed,
        vec!["Bhutan", "India", "Nepal"]
    );
    assert!(result
        .ranked_insights
        .iter()
        .all(|i| i.country.as_deref() != Some("Maldives")));
}

#[test]
fn anomaly_ranks_first_on_tied_scores() {
    // Force ties by zeroing every bonus except the per-type constant.
    let scoring = ScoringConfig {
        significance_bonus: 0.0,
        magnitude_bonus: 0.0,
        anomaly_bonus: 0.0,
        completeness_bonus: 0.0,
        fit_bonus: 0.0,
        recency_bonus: 0.0,
        ..ScoringConfig::default()
    };
    let engine = InsightEngine::with_scoring(scoring);
    let panel = sample_panel();
    let filter = gini_filter(&all_countries(), (2010, 2020))
        .with_types([InsightType::Trend, InsightType::Anomaly]);

    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();
    assert!(result.ranked_insights.len() > 1);
    // everything scores 0.0, so type priority decides: anomalies first
    assert_eq!(result.ranked_insights[0].insight_type, InsightType::Anomaly);
    // and within a type, countries sort ascending
    let trend_countries: Vec<_> = result
        .ranked_insights
        .iter()
        .filter(|i| i.insight_type == InsightType::Trend)
        .map(|i| i.country.clone())
        .collect();
    let mut sorted = trend_countries.clone();
    sorted.sort_by(|a, b| {
        a.as_deref()
            .unwrap_or("")
            .cmp(b.as_deref().unwrap_or(""))
    });
    assert_eq!(trend_countries, sorted);
}

/// Emits the same (type, title) twice with different evidence, so only the
/// deduplication step can decide which one survives.
struct RepeatingGenerator;

impl InsightGenerator for RepeatingGenerator {
    fn name(&self) -> &'static str {
        "Repeating"
    }

    fn provides(&self) -> &'static [InsightType] {
        &[InsightType::Quality]
    }

    fn generate(&self, _ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        vec![
            Insight::new(InsightType::Quality, "Repeated headline", "weaker variant"),
            Insight::new(InsightType::Quality, "Repeated headline", "stronger variant")
                .with_evidence("completeness_pct", 100.0),
        ]
    }
}

#[test]
fn duplicate_titles_keep_the_higher_scored_instance() {
    let mut engine = InsightEngine::new();
    engine.register(Box::new(RepeatingGenerator));
    let panel = sample_panel();
    let filter = gini_filter(&all_countries(), (2010, 2020)).with_types([InsightType::Quality]);

    let result = engine.generate_ranked_insights(&panel, &filter).unwrap();

    let repeated: Vec<_> = result
        .ranked_insights
        .iter()
        .filter(|i| i.title == "Repeated headline")
        .collect();
    assert_eq!(repeated.len(), 1);
    // the later, higher-scored variant wins (completeness bonus: 2.0 vs 0.0)
    assert_eq!(repeated[0].narrative, "stronger variant");
    assert_eq!(repeated[0].score, 2.0);

    // the builtin quality caveat for Maldives plus the single survivor
    assert_eq!(result.metadata.total_generated, 2);
    assert_eq!(result.metadata.total_shown, 2);
}

#[test]
fn custom_scoring_thresholds_change_scores() {
    let panel = vec![
        Observation::new("CountryA", 2015, "gini", 30.0),
        Observation::new("CountryA", 2016, "gini", 32.0),
        Observation::new("CountryA", 2017, "gini", 34.0),
        Observation::new("CountryA", 2018, "gini", 36.0),
    ];
    let filter = gini_filter(&["CountryA"], (2015, 2018)).with_types([InsightType::Trend]);

    let default_score = InsightEngine::new()
        .generate_ranked_insights(&panel, &filter)
        .unwrap()
        .ranked_insights[0]
        .score;

    // change_relative of 20.0 clears a lowered magnitude threshold
    let scoring = ScoringConfig {
        magnitude_threshold_pct: 15.0,
        ..ScoringConfig::default()
    };
    let custom_score = InsightEngine::with_scoring(scoring)
        .generate_ranked_insights(&panel, &filter)
        .unwrap()
        .ranked_insights[0]
        .score;

    assert_eq!(custom_score, default_score + 4.0);
}

#[test]
fn invalid_filters_fail_before_generation() {
    let engine = InsightEngine::new();
    let panel = sample_panel();

    let mut filter = gini_filter(&all_countries(), (2010, 2020));
    filter.max_insights = 0;
    assert!(engine.generate_ranked_insights(&panel, &filter).is_err());

    let filter = gini_filter(&all_countries(), (2020, 2010));
    assert!(engine.generate_ranked_insights(&panel, &filter).is_err());

    let filter = gini_filter(&[], (2010, 2020));
    assert!(engine.generate_ranked_insights(&panel, &filter).is_err());
}
