//! Correlation engine
//!
//! Pairs input and outcome samples by record id (pairwise-complete: a record
//! missing either variable is dropped from that pair only) and computes
//! Pearson r, sample count and two-tailed significance for every
//! (input, outcome) combination in the catalogs.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::models::{BrewRecord, VariableSample};
use crate::stats;
use crate::variables::{self, VariableKind, INPUT_VARIABLES, OUTCOME_VARIABLES};

/// Default minimum number of paired records for a correlation
pub const MIN_SAMPLES: usize = 5;

/// Strength band of |r|
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Negligible,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl Strength {
    pub fn from_r(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude < 0.1 {
            Strength::Negligible
        } else if magnitude < 0.3 {
            Strength::Weak
        } else if magnitude < 0.5 {
            Strength::Moderate
        } else if magnitude < 0.7 {
            Strength::Strong
        } else {
            Strength::VeryStrong
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Negligible => "negligible",
            Strength::Weak => "weak",
            Strength::Moderate => "moderate",
            Strength::Strong => "strong",
            Strength::VeryStrong => "very_strong",
        }
    }

    /// Capitalized phrase for sentences ("Very strong")
    pub fn label(&self) -> &'static str {
        match self {
            Strength::Negligible => "Negligible",
            Strength::Weak => "Weak",
            Strength::Moderate => "Moderate",
            Strength::Strong => "Strong",
            Strength::VeryStrong => "Very strong",
        }
    }
}

/// Interpretation of a correlation coefficient: strength band plus sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    Negligible,
    WeakPositive,
    WeakNegative,
    ModeratePositive,
    ModerateNegative,
    StrongPositive,
    StrongNegative,
    VeryStrongPositive,
    VeryStrongNegative,
}

impl Interpretation {
    pub fn from_r(r: f64) -> Self {
        let positive = r >= 0.0;
        match (Strength::from_r(r), positive) {
            (Strength::Negligible, _) => Interpretation::Negligible,
            (Strength::Weak, true) => Interpretation::WeakPositive,
            (Strength::Weak, false) => Interpretation::WeakNegative,
            (Strength::Moderate, true) => Interpretation::ModeratePositive,
            (Strength::Moderate, false) => Interpretation::ModerateNegative,
            (Strength::Strong, true) => Interpretation::StrongPositive,
            (Strength::Strong, false) => Interpretation::StrongNegative,
            (Strength::VeryStrong, true) => Interpretation::VeryStrongPositive,
            (Strength::VeryStrong, false) => Interpretation::VeryStrongNegative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interpretation::Negligible => "negligible",
            Interpretation::WeakPositive => "weak_positive",
            Interpretation::WeakNegative => "weak_negative",
            Interpretation::ModeratePositive => "moderate_positive",
            Interpretation::ModerateNegative => "moderate_negative",
            Interpretation::StrongPositive => "strong_positive",
            Interpretation::StrongNegative => "strong_negative",
            Interpretation::VeryStrongPositive => "very_strong_positive",
            Interpretation::VeryStrongNegative => "very_strong_negative",
        }
    }

    pub fn strength(&self) -> Strength {
        match self {
            Interpretation::Negligible => Strength::Negligible,
            Interpretation::WeakPositive | Interpretation::WeakNegative => Strength::Weak,
            Interpretation::ModeratePositive | Interpretation::ModerateNegative => {
                Strength::Moderate
            }
            Interpretation::StrongPositive | Interpretation::StrongNegative => Strength::Strong,
            Interpretation::VeryStrongPositive | Interpretation::VeryStrongNegative => {
                Strength::VeryStrong
            }
        }
    }

    /// Sign of the relationship, `None` for negligible
    pub fn is_positive(&self) -> Option<bool> {
        match self {
            Interpretation::Negligible => None,
            Interpretation::WeakPositive
            | Interpretation::ModeratePositive
            | Interpretation::StrongPositive
            | Interpretation::VeryStrongPositive => Some(true),
            _ => Some(false),
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A computed correlation between one input and one outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub r: f64,
    pub n: usize,
    pub p: f64,
    pub interpretation: Interpretation,
}

impl CorrelationResult {
    /// Strength used for ranking, see [`rank_key`]
    pub fn rank_key(&self) -> i64 {
        rank_key(self.r)
    }

    /// Build a result from r and n, deriving p and the interpretation
    pub fn from_r(r: f64, n: usize) -> Self {
        let r = r.clamp(-1.0, 1.0);
        Self {
            r,
            n,
            p: stats::correlation_p_value(r, n),
            interpretation: Interpretation::from_r(r),
        }
    }
}

/// |r| rounded to 12 decimal places.
///
/// Correlations that agree to that precision rank as tied, so name and
/// catalog tie-breaks apply to mathematically equal values.
pub fn rank_key(r: f64) -> i64 {
    (r.abs() * 1e12).round() as i64
}

/// Outcome of correlating one (input, outcome) pair
#[derive(Debug, Clone, PartialEq)]
pub enum PairCorrelation {
    Correlation(CorrelationResult),
    /// Fewer paired records than required
    InsufficientData {
        paired: usize,
        input_samples: usize,
        outcome_samples: usize,
    },
    /// One side has the same value in every paired record
    DegenerateVariance { paired: usize },
}

impl PairCorrelation {
    pub fn result(&self) -> Option<&CorrelationResult> {
        match self {
            PairCorrelation::Correlation(result) => Some(result),
            _ => None,
        }
    }
}

/// On the wire only computed correlations carry a value; both "no signal"
/// cases are `null`.
impl Serialize for PairCorrelation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PairCorrelation::Correlation(result) => result.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

/// One record contributing to a pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedSample {
    pub record_id: String,
    pub x: f64,
    pub y: f64,
}

/// Intersect two sample lists by record id, keeping input order.
///
/// A record id repeated within one list only counts once (first value wins).
pub fn pair_samples(input: &[VariableSample], outcome: &[VariableSample]) -> Vec<PairedSample> {
    let mut outcome_by_id: HashMap<&str, f64> = HashMap::with_capacity(outcome.len());
    for sample in outcome {
        outcome_by_id
            .entry(sample.record_id.as_str())
            .or_insert(sample.value);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(input.len());
    input
        .iter()
        .filter(|sample| seen.insert(sample.record_id.as_str()))
        .filter_map(|sample| {
            outcome_by_id
                .get(sample.record_id.as_str())
                .map(|&y| PairedSample {
                    record_id: sample.record_id.clone(),
                    x: sample.value,
                    y,
                })
        })
        .collect()
}

/// Correlate already-paired samples. `None` when r is undefined.
///
/// Sums run in record id order so r does not depend on the order the
/// records arrived in.
pub fn correlate_paired(pairs: &[PairedSample]) -> Option<CorrelationResult> {
    let mut ordered: Vec<&PairedSample> = pairs.iter().collect();
    ordered.sort_by(|a, b| a.record_id.cmp(&b.record_id));

    let xs: Vec<f64> = ordered.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = ordered.iter().map(|p| p.y).collect();
    stats::pearson(&xs, &ys).map(|r| CorrelationResult::from_r(r, pairs.len()))
}

/// Correlate one pair, classifying why no value is available
pub fn correlate_pair(
    input: &[VariableSample],
    outcome: &[VariableSample],
    min_samples: usize,
) -> PairCorrelation {
    let pairs = pair_samples(input, outcome);
    let paired = pairs.len();

    if paired < min_samples {
        return PairCorrelation::InsufficientData {
            paired,
            input_samples: input.len(),
            outcome_samples: outcome.len(),
        };
    }

    match correlate_paired(&pairs) {
        Some(result) => PairCorrelation::Correlation(result),
        None => PairCorrelation::DegenerateVariance { paired },
    }
}

/// Correlate one pair with the default threshold; `None` for no signal
pub fn correlate(input: &[VariableSample], outcome: &[VariableSample]) -> Option<CorrelationResult> {
    correlate_pair(input, outcome, MIN_SAMPLES).result().copied()
}

/// Every input against every outcome, indexed in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    inputs: Vec<&'static str>,
    outcomes: Vec<&'static str>,
    /// Row per input, column per outcome
    cells: Vec<Vec<PairCorrelation>>,
}

impl CorrelationMatrix {
    /// Full catalog matrix with every cell marked as having no data
    pub fn empty() -> Self {
        let inputs = variables::input_names();
        let outcomes = variables::outcome_names();
        let cells = inputs
            .iter()
            .map(|_| {
                outcomes
                    .iter()
                    .map(|_| PairCorrelation::InsufficientData {
                        paired: 0,
                        input_samples: 0,
                        outcome_samples: 0,
                    })
                    .collect()
            })
            .collect();
        Self {
            inputs,
            outcomes,
            cells,
        }
    }

    /// Compute the matrix from extracted samples.
    ///
    /// Variables absent from `samples` are treated as having no samples.
    pub fn compute(samples: &HashMap<&'static str, Vec<VariableSample>>, min_samples: usize) -> Self {
        let none: Vec<VariableSample> = Vec::new();
        let mut matrix = Self::empty();

        for (row, input) in INPUT_VARIABLES.iter().enumerate() {
            let input_samples = samples.get(input.name).unwrap_or(&none);
            for (col, outcome) in OUTCOME_VARIABLES.iter().enumerate() {
                let outcome_samples = samples.get(outcome.name).unwrap_or(&none);
                matrix.cells[row][col] = correlate_pair(input_samples, outcome_samples, min_samples);
            }
        }

        let computed = matrix.iter().filter(|(_, _, c)| c.result().is_some()).count();
        tracing::debug!(
            pairs = matrix.inputs.len() * matrix.outcomes.len(),
            computed,
            min_samples,
            "Correlation matrix computed"
        );

        matrix
    }

    /// Extract every catalog variable from the records and compute the matrix
    pub fn from_records(records: &[BrewRecord], min_samples: usize) -> Self {
        Self::compute(&variables::extract_all(records), min_samples)
    }

    pub fn inputs(&self) -> &[&'static str] {
        &self.inputs
    }

    pub fn outcomes(&self) -> &[&'static str] {
        &self.outcomes
    }

    fn position(&self, input: &str, outcome: &str) -> Option<(usize, usize)> {
        let row = self.inputs.iter().position(|n| *n == input)?;
        let col = self.outcomes.iter().position(|n| *n == outcome)?;
        Some((row, col))
    }

    /// Cell for a pair, `None` if either name is not in the catalog
    pub fn get(&self, input: &str, outcome: &str) -> Option<&PairCorrelation> {
        self.position(input, outcome)
            .map(|(row, col)| &self.cells[row][col])
    }

    /// Computed correlation for a pair, if any
    pub fn result(&self, input: &str, outcome: &str) -> Option<&CorrelationResult> {
        self.get(input, outcome).and_then(PairCorrelation::result)
    }

    /// Replace one cell
    pub fn set(&mut self, input: &str, outcome: &str, cell: PairCorrelation) -> Result<()> {
        variables::lookup_kind(input, VariableKind::Input)?;
        variables::lookup_kind(outcome, VariableKind::Outcome)?;
        let (row, col) = self
            .position(input, outcome)
            .ok_or_else(|| Error::UnknownVariable(format!("{} / {}", input, outcome)))?;
        self.cells[row][col] = cell;
        Ok(())
    }

    /// All cells, input-major, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str, &PairCorrelation)> + '_ {
        self.inputs.iter().enumerate().flat_map(move |(row, input)| {
            self.outcomes
                .iter()
                .enumerate()
                .map(move |(col, outcome)| (*input, *outcome, &self.cells[row][col]))
        })
    }

    /// Cells of one outcome column, in input catalog order
    pub fn column<'a>(
        &'a self,
        outcome: &str,
    ) -> impl Iterator<Item = (&'static str, &'a PairCorrelation)> + 'a {
        let col = self.outcomes.iter().position(|n| *n == outcome);
        self.inputs
            .iter()
            .enumerate()
            .filter_map(move |(row, input)| col.map(|col| (*input, &self.cells[row][col])))
    }
}

struct MatrixRow<'a> {
    outcomes: &'a [&'static str],
    cells: &'a [PairCorrelation],
}

impl Serialize for MatrixRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.outcomes.len()))?;
        for (outcome, cell) in self.outcomes.iter().zip(self.cells) {
            map.serialize_entry(outcome, cell)?;
        }
        map.end()
    }
}

/// Serializes as `{ input: { outcome: CorrelationResult | null } }` with keys
/// in catalog order.
impl Serialize for CorrelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inputs.len()))?;
        for (input, cells) in self.inputs.iter().zip(&self.cells) {
            map.serialize_entry(
                input,
                &MatrixRow {
                    outcomes: &self.outcomes,
                    cells,
                },
            )?;
        }
        map.end()
    }
}
