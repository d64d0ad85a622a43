//! Property-based tests for brewlab-core
//!
//! - Statistical invariants of the correlation engine
//! - Order independence of ranking
//! - Consistency between detail output and the correlation it reports
//! - Run with ProptestConfig::with_cases(100)

use brewlab_core::{
    correlation::{correlate, CorrelationMatrix},
    detail, generator, ranking, stats, trends, AnalysisConfig, BrewRecord, InsightKind,
    VariableSample, MIN_SAMPLES,
};
use chrono::NaiveDate;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// A series with at least two distinct values
fn arb_varying_series(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-1000.0f64..1000.0, len)
        .prop_filter("series must vary", |v| v.iter().any(|x| *x != v[0]))
}

fn to_samples(values: &[f64]) -> Vec<VariableSample> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| VariableSample {
            record_id: format!("b{}", i),
            value: *value,
        })
        .collect()
}

/// Sparse brews: each field may be missing
fn arb_brews() -> impl Strategy<Value = Vec<BrewRecord>> {
    proptest::collection::vec(
        (
            proptest::option::weighted(0.8, 85i32..100),
            proptest::option::weighted(0.8, 15i32..30),
            proptest::option::weighted(0.8, 1i32..11),
            proptest::option::weighted(0.6, 120i32..160),
        ),
        0..25,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (temp, grind, score, tds))| {
                let mut record = BrewRecord::new(format!("b{}", i));
                if let Some(temp) = temp {
                    record = record.with_field("water_temperature", temp);
                }
                if let Some(grind) = grind {
                    record = record.with_field("grind_size", grind);
                }
                if let Some(score) = score {
                    record = record.with_field("overall_score", score);
                }
                if let Some(tds) = tds {
                    record = record.with_field("tds", f64::from(tds) / 100.0);
                }
                record
            })
            .collect()
    })
}

/// Dated history of one metric
fn arb_history() -> impl Strategy<Value = Vec<(NaiveDate, f64)>> {
    proptest::collection::vec((0u32..60, 1.0f64..10.0), 0..12).prop_map(|rows| {
        rows.into_iter()
            .map(|(offset, value)| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i64::from(offset));
                (date, (value * 2.0).round() / 2.0)
            })
            .collect()
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: a variable correlated with itself gives r = 1
    #[test]
    fn prop_self_correlation_is_one(values in arb_varying_series(5..40)) {
        let samples = to_samples(&values);
        let result = correlate(&samples, &samples).unwrap();
        prop_assert!((result.r - 1.0).abs() < 1e-9);
        prop_assert_eq!(result.n, values.len());
    }

    /// Property: fewer than MIN_SAMPLES paired records never yields a value
    #[test]
    fn prop_small_samples_have_no_correlation(
        xs in proptest::collection::vec(-100.0f64..100.0, 0..MIN_SAMPLES),
        ys in proptest::collection::vec(-100.0f64..100.0, 0..MIN_SAMPLES),
    ) {
        prop_assert!(correlate(&to_samples(&xs), &to_samples(&ys)).is_none());
    }

    /// Property: r stays in [-1, 1] and p in [0, 1]
    #[test]
    fn prop_r_and_p_bounded(
        xs in arb_varying_series(5..30),
        ys in arb_varying_series(5..30),
    ) {
        if let Some(result) = correlate(&to_samples(&xs), &to_samples(&ys)) {
            prop_assert!((-1.0..=1.0).contains(&result.r));
            prop_assert!((0.0..=1.0).contains(&result.p));
            prop_assert_eq!(result.n, xs.len().min(ys.len()));
        }
    }

    /// Property: ranking does not depend on record order
    #[test]
    fn prop_rank_stable_under_reordering(
        (brews, shuffled) in arb_brews().prop_flat_map(|brews| {
            let shuffled = Just(brews.clone()).prop_shuffle();
            (Just(brews), shuffled)
        })
    ) {
        let original = ranking::rank(&CorrelationMatrix::from_records(&brews, MIN_SAMPLES), MIN_SAMPLES);
        let reordered = ranking::rank(&CorrelationMatrix::from_records(&shuffled, MIN_SAMPLES), MIN_SAMPLES);

        let sequence = |r: &ranking::Ranking| -> Vec<(String, String)> {
            r.insights.iter().map(|i| (i.input.clone(), i.outcome.clone())).collect()
        };
        prop_assert_eq!(sequence(&original), sequence(&reordered));
        prop_assert_eq!(&original.warnings, &reordered.warnings);
        prop_assert_eq!(&original, &reordered);
    }

    /// Property: inputs that are exact linear functions of the score tie,
    /// and the tie resolves by name whatever the record order
    #[test]
    fn prop_tied_inputs_rank_by_name(
        (brews, shuffled) in proptest::collection::vec(1u32..40, 5..20)
            .prop_map(|scores| {
                scores
                    .into_iter()
                    .enumerate()
                    .map(|(i, score)| {
                        let score = f64::from(score) / 4.0;
                        BrewRecord::new(format!("b{}", i))
                            .with_field("overall_score", score)
                            .with_field("water_temperature", 88.3 + 0.7 * score)
                            .with_field("bloom_time", 17.1 + 3.3 * score)
                    })
                    .collect::<Vec<_>>()
            })
            .prop_filter("scores must vary", |brews| {
                brews.iter().any(|b| b.numeric("overall_score") != brews[0].numeric("overall_score"))
            })
            .prop_flat_map(|brews| {
                let shuffled = Just(brews.clone()).prop_shuffle();
                (Just(brews), shuffled)
            })
    ) {
        for records in [&brews, &shuffled] {
            let ranked = ranking::rank(&CorrelationMatrix::from_records(records, MIN_SAMPLES), MIN_SAMPLES);
            let order: Vec<&str> = ranked.insights.iter().map(|i| i.input.as_str()).collect();
            prop_assert_eq!(order, vec!["bloom_time", "water_temperature"]);
        }
    }

    /// Property: scatter data reproduces the reported r
    #[test]
    fn prop_detail_scatter_reproduces_r(brews in arb_brews()) {
        let temps = brewlab_core::variables::extract_variable(&brews, "water_temperature");
        let scores = brewlab_core::variables::extract_variable(&brews, "overall_score");

        if let Ok(pair) = detail::project(&temps, &scores, "water_temperature", "overall_score", MIN_SAMPLES) {
            let xs: Vec<f64> = pair.scatter_data.iter().map(|p| p.x).collect();
            let ys: Vec<f64> = pair.scatter_data.iter().map(|p| p.y).collect();
            let r = stats::pearson(&xs, &ys).unwrap();
            prop_assert!((r - pair.correlation.r).abs() < 1e-9);
            prop_assert_eq!(pair.correlation.n, pair.scatter_data.len());
        }
    }

    /// Property: a metric is never both "goal reached" and "change"
    #[test]
    fn prop_goal_reached_excludes_change(
        history in arb_history(),
        target in 1.0f64..10.0,
        brews in arb_brews(),
    ) {
        let config = AnalysisConfig::default();
        let trend = trends::track("overall_score", &history, Some(target), &config).unwrap();
        let matrix = CorrelationMatrix::from_records(&brews, MIN_SAMPLES);
        let items = generator::generate(&[trend.clone()], Some(&matrix));

        let reached = items.iter().any(|i| i.message.contains("goal reached"));
        let change = items.iter().any(|i| i.kind == InsightKind::Change);
        prop_assert!(!(reached && change));
        prop_assert_eq!(reached, trend.target_met);
    }
}
