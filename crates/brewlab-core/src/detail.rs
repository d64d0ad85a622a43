//! Pair detail: scatter data and a one-sentence reading of one correlation

use serde::{Deserialize, Serialize};

use crate::correlation::{correlate_paired, pair_samples, CorrelationResult};
use crate::error::{Error, Result};
use crate::models::VariableSample;
use crate::variables::{self, Variable, VariableKind};

/// One paired record, tagged with its source for UI linking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub record_id: String,
}

/// Scatter detail for one (input, outcome) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDetail {
    pub input_variable: String,
    pub outcome_variable: String,
    pub correlation: CorrelationResult,
    /// Ordered like the input samples
    pub scatter_data: Vec<ScatterPoint>,
    /// Plain-language reading of the correlation
    pub insight: String,
}

/// "Moderate positive relationship: higher water temperature tends to come
/// with higher overall score"
pub fn describe(input: &Variable, outcome: &Variable, result: &CorrelationResult) -> String {
    let interpretation = result.interpretation;
    let x = input.label.to_lowercase();
    let y = outcome.label.to_lowercase();

    match interpretation.is_positive() {
        None => format!("No meaningful relationship between {} and {}", x, y),
        Some(positive) => format!(
            "{} {} relationship: higher {} tends to come with {} {}",
            interpretation.strength().label(),
            if positive { "positive" } else { "negative" },
            x,
            if positive { "higher" } else { "lower" },
            y
        ),
    }
}

/// Project one pair into scatter detail.
///
/// Fails with `UnknownVariable` when either name is outside its catalog,
/// `InsufficientData` below `min_samples` paired records and `NoVariation`
/// when one side is constant.
pub fn project(
    input_samples: &[VariableSample],
    outcome_samples: &[VariableSample],
    input_name: &str,
    outcome_name: &str,
    min_samples: usize,
) -> Result<PairDetail> {
    let input = variables::lookup_kind(input_name, VariableKind::Input)?;
    let outcome = variables::lookup_kind(outcome_name, VariableKind::Outcome)?;

    let pairs = pair_samples(input_samples, outcome_samples);
    if pairs.len() < min_samples {
        return Err(Error::InsufficientData {
            input: input.name.to_string(),
            outcome: outcome.name.to_string(),
            found: pairs.len(),
            required: min_samples,
        });
    }

    let correlation = correlate_paired(&pairs).ok_or_else(|| Error::NoVariation {
        input: input.name.to_string(),
        outcome: outcome.name.to_string(),
    })?;

    let insight = describe(input, outcome, &correlation);
    let scatter_data = pairs
        .into_iter()
        .map(|pair| ScatterPoint {
            x: pair.x,
            y: pair.y,
            record_id: pair.record_id,
        })
        .collect();

    Ok(PairDetail {
        input_variable: input.name.to_string(),
        outcome_variable: outcome.name.to_string(),
        correlation,
        scatter_data,
        insight,
    })
}
