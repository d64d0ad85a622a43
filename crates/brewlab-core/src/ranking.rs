//! Insight ranking
//!
//! Turns a correlation matrix into a ranked list of insights (correlations
//! strong enough to act on) and a list of warnings for pairs that have some
//! data on each side but not enough paired records yet.

use serde::{Deserialize, Serialize};

use crate::config::INSIGHT_THRESHOLD;
use crate::correlation::{rank_key, CorrelationMatrix, Interpretation, PairCorrelation};

/// A correlation worth reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationInsight {
    pub input: String,
    pub outcome: String,
    pub r: f64,
    pub n: usize,
    pub p: f64,
    pub interpretation: Interpretation,
    pub message: String,
}

/// A pair that could not be correlated for lack of paired records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataWarning {
    pub input: String,
    pub outcome: String,
    /// Records with both variables
    pub paired: usize,
    /// Records needed
    pub required: usize,
    pub message: String,
}

/// Ranked insights plus insufficiency warnings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub insights: Vec<CorrelationInsight>,
    pub warnings: Vec<DataWarning>,
}

/// "water_temperature correlates positively (r=+0.42) with overall_score"
pub fn insight_message(input: &str, outcome: &str, r: f64) -> String {
    let direction = if r >= 0.0 { "positively" } else { "negatively" };
    format!(
        "{} correlates {} (r={:+.2}) with {}",
        input, direction, r, outcome
    )
}

fn warning_message(input: &str, outcome: &str, paired: usize, required: usize) -> String {
    let brews = if paired == 1 { "brew records" } else { "brews record" };
    format!(
        "Only {} {} both {} and {} (need at least {})",
        paired, brews, input, outcome, required
    )
}

/// Rank with the default |r| threshold
pub fn rank(matrix: &CorrelationMatrix, min_samples: usize) -> Ranking {
    rank_with_threshold(matrix, min_samples, INSIGHT_THRESHOLD)
}

/// Select and order insights, and collect warnings.
///
/// Insights are sorted by |r| descending, ties by outcome then input name.
/// Warnings follow catalog order. A pair with no samples at all on one side
/// is "no data" and produces neither.
pub fn rank_with_threshold(
    matrix: &CorrelationMatrix,
    min_samples: usize,
    threshold: f64,
) -> Ranking {
    let mut ranking = Ranking::default();

    for (input, outcome, cell) in matrix.iter() {
        match cell {
            PairCorrelation::InsufficientData {
                paired,
                input_samples,
                outcome_samples,
            } => {
                if *input_samples > 0 && *outcome_samples > 0 {
                    ranking.warnings.push(DataWarning {
                        input: input.to_string(),
                        outcome: outcome.to_string(),
                        paired: *paired,
                        required: min_samples,
                        message: warning_message(input, outcome, *paired, min_samples),
                    });
                }
            }
            // Computed under a lower threshold than this ranking asks for
            PairCorrelation::Correlation(result) if result.n < min_samples => {
                ranking.warnings.push(DataWarning {
                    input: input.to_string(),
                    outcome: outcome.to_string(),
                    paired: result.n,
                    required: min_samples,
                    message: warning_message(input, outcome, result.n, min_samples),
                });
            }
            PairCorrelation::Correlation(result) => {
                if result.r.abs() >= threshold {
                    ranking.insights.push(CorrelationInsight {
                        input: input.to_string(),
                        outcome: outcome.to_string(),
                        r: result.r,
                        n: result.n,
                        p: result.p,
                        interpretation: result.interpretation,
                        message: insight_message(input, outcome, result.r),
                    });
                }
            }
            PairCorrelation::DegenerateVariance { .. } => {}
        }
    }

    ranking.insights.sort_by(|a, b| {
        rank_key(b.r)
            .cmp(&rank_key(a.r))
            .then_with(|| a.outcome.cmp(&b.outcome))
            .then_with(|| a.input.cmp(&b.input))
    });

    tracing::debug!(
        insights = ranking.insights.len(),
        warnings = ranking.warnings.len(),
        min_samples,
        "Ranked correlations"
    );

    ranking
}
