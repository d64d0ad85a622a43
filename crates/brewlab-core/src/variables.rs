//! Variable catalog and extraction
//!
//! Brew records are sparse: most fields are optional and users fill in what
//! they measured. Extraction projects each record onto the fixed catalogs of
//! input and outcome variables, keeping only finite numbers. A record missing
//! a variable simply contributes no sample for it.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{BrewRecord, VariableSample};

/// Whether a variable is a brewing parameter or a measured/rated result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Input,
    Outcome,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Input => "input",
            VariableKind::Outcome => "outcome",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a goal target is judged for an outcome metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricScale {
    /// Rated 1-10 (sensory intensities, overall score): more is better
    Scale,
    /// Measured quantity that should match its target within a tolerance
    Continuous,
}

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Variable {
    pub name: &'static str,
    pub kind: VariableKind,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    /// Decimal places used when quoting values in messages
    pub precision: usize,
    /// Goal semantics, outcomes only
    pub scale: Option<MetricScale>,
}

impl Variable {
    const fn input(
        name: &'static str,
        label: &'static str,
        unit: Option<&'static str>,
        precision: usize,
    ) -> Self {
        Self {
            name,
            kind: VariableKind::Input,
            label,
            unit,
            precision,
            scale: None,
        }
    }

    const fn outcome(
        name: &'static str,
        label: &'static str,
        unit: Option<&'static str>,
        precision: usize,
        scale: MetricScale,
    ) -> Self {
        Self {
            name,
            kind: VariableKind::Outcome,
            label,
            unit,
            precision,
            scale: Some(scale),
        }
    }

    /// Format a value of this variable with its display precision
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.precision, value)
    }
}

/// Brewing parameters, in catalog order
pub const INPUT_VARIABLES: &[Variable] = &[
    Variable::input("coffee_weight", "Coffee Weight", Some("g"), 1),
    Variable::input("water_weight", "Water Weight", Some("g"), 0),
    Variable::input("ratio", "Brew Ratio", None, 1),
    Variable::input("grind_size", "Grind Size", None, 1),
    Variable::input("water_temperature", "Water Temperature", Some("°C"), 1),
    Variable::input("bloom_water", "Bloom Water", Some("g"), 0),
    Variable::input("bloom_time", "Bloom Time", Some("s"), 0),
    Variable::input("number_of_pours", "Number of Pours", None, 0),
    Variable::input("total_brew_time", "Total Brew Time", Some("s"), 0),
    Variable::input("days_off_roast", "Days Off Roast", Some("days"), 0),
];

/// Measured and rated results, in catalog order
pub const OUTCOME_VARIABLES: &[Variable] = &[
    Variable::outcome("tds", "TDS", Some("%"), 2, MetricScale::Continuous),
    Variable::outcome(
        "extraction_yield",
        "Extraction Yield",
        Some("%"),
        1,
        MetricScale::Continuous,
    ),
    Variable::outcome("fragrance_intensity", "Fragrance", None, 1, MetricScale::Scale),
    Variable::outcome("aroma_intensity", "Aroma", None, 1, MetricScale::Scale),
    Variable::outcome("flavor_intensity", "Flavor", None, 1, MetricScale::Scale),
    Variable::outcome("aftertaste_intensity", "Aftertaste", None, 1, MetricScale::Scale),
    Variable::outcome("acidity_intensity", "Acidity", None, 1, MetricScale::Scale),
    Variable::outcome("sweetness_intensity", "Sweetness", None, 1, MetricScale::Scale),
    Variable::outcome("body_intensity", "Body", None, 1, MetricScale::Scale),
    Variable::outcome("bitterness_intensity", "Bitterness", None, 1, MetricScale::Scale),
    Variable::outcome("clarity_intensity", "Clarity", None, 1, MetricScale::Scale),
    Variable::outcome("overall_score", "Overall Score", None, 1, MetricScale::Scale),
];

/// Resolve a variable from either catalog
pub fn lookup(name: &str) -> Result<&'static Variable> {
    INPUT_VARIABLES
        .iter()
        .chain(OUTCOME_VARIABLES.iter())
        .find(|v| v.name == name)
        .ok_or_else(|| Error::UnknownVariable(name.to_string()))
}

/// Resolve a variable that must be of the given kind
pub fn lookup_kind(name: &str, kind: VariableKind) -> Result<&'static Variable> {
    let variable = lookup(name)?;
    if variable.kind != kind {
        return Err(Error::UnknownVariable(format!(
            "{} is not an {} variable",
            name, kind
        )));
    }
    Ok(variable)
}

/// Names of all input variables in catalog order
pub fn input_names() -> Vec<&'static str> {
    INPUT_VARIABLES.iter().map(|v| v.name).collect()
}

/// Names of all outcome variables in catalog order
pub fn outcome_names() -> Vec<&'static str> {
    OUTCOME_VARIABLES.iter().map(|v| v.name).collect()
}

/// Samples of one variable across a record set, in record order
pub fn extract_variable(records: &[BrewRecord], name: &str) -> Vec<VariableSample> {
    records
        .iter()
        .filter_map(|record| {
            record.numeric(name).map(|value| VariableSample {
                record_id: record.id.clone(),
                value,
            })
        })
        .collect()
}

/// Extract samples for each named variable.
///
/// Every name must be in a catalog; an unknown name fails the whole call.
pub fn extract<S: AsRef<str>>(
    records: &[BrewRecord],
    names: &[S],
) -> Result<HashMap<&'static str, Vec<VariableSample>>> {
    let mut extracted = HashMap::with_capacity(names.len());
    for name in names {
        let variable = lookup(name.as_ref())?;
        extracted.insert(variable.name, extract_variable(records, variable.name));
    }

    tracing::debug!(
        records = records.len(),
        variables = extracted.len(),
        "Extracted variable samples"
    );

    Ok(extracted)
}

/// Extract every catalog variable, inputs and outcomes
pub fn extract_all(records: &[BrewRecord]) -> HashMap<&'static str, Vec<VariableSample>> {
    INPUT_VARIABLES
        .iter()
        .chain(OUTCOME_VARIABLES.iter())
        .map(|v| (v.name, extract_variable(records, v.name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<BrewRecord> {
        vec![
            BrewRecord::new("a")
                .with_field("water_temperature", 93.5)
                .with_field("overall_score", 7),
            BrewRecord::new("b")
                .with_field("water_temperature", "hot")
                .with_field("overall_score", 8),
            BrewRecord::new("c").with_field("water_temperature", 95),
        ]
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(INPUT_VARIABLES.len(), 10);
        assert_eq!(OUTCOME_VARIABLES.len(), 12);

        let intensities = OUTCOME_VARIABLES
            .iter()
            .filter(|v| v.name.ends_with("_intensity"))
            .count();
        assert_eq!(intensities, 9);
    }

    #[test]
    fn test_catalog_names_unique() {
        let mut names: Vec<&str> = INPUT_VARIABLES
            .iter()
            .chain(OUTCOME_VARIABLES.iter())
            .map(|v| v.name)
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_every_outcome_has_scale() {
        assert!(OUTCOME_VARIABLES.iter().all(|v| v.scale.is_some()));
        assert!(INPUT_VARIABLES.iter().all(|v| v.scale.is_none()));
        assert_eq!(lookup("tds").unwrap().scale, Some(MetricScale::Continuous));
        assert_eq!(
            lookup("overall_score").unwrap().scale,
            Some(MetricScale::Scale)
        );
    }

    #[test]
    fn test_lookup_unknown() {
        let err = lookup("crema_thickness").unwrap_err();
        assert!(matches!(err, Error::UnknownVariable(ref n) if n == "crema_thickness"));
    }

    #[test]
    fn test_lookup_kind_mismatch() {
        assert!(lookup_kind("tds", VariableKind::Outcome).is_ok());
        assert!(matches!(
            lookup_kind("tds", VariableKind::Input),
            Err(Error::UnknownVariable(_))
        ));
    }

    #[test]
    fn test_extract_skips_missing_and_non_numeric() {
        let extracted = extract(&records(), &["water_temperature", "overall_score"]).unwrap();

        let temps = &extracted["water_temperature"];
        assert_eq!(temps.len(), 2);
        assert_eq!(temps[0].record_id, "a");
        assert_eq!(temps[0].value, 93.5);
        assert_eq!(temps[1].record_id, "c");

        let scores = &extracted["overall_score"];
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[1].record_id, "b");
    }

    #[test]
    fn test_extract_unknown_name_fails() {
        let result = extract(&records(), &["water_temperature", "altitude"]);
        assert!(matches!(result, Err(Error::UnknownVariable(ref n)) if n == "altitude"));
    }

    #[test]
    fn test_extract_all_covers_catalog() {
        let extracted = extract_all(&records());
        assert_eq!(
            extracted.len(),
            INPUT_VARIABLES.len() + OUTCOME_VARIABLES.len()
        );
        assert!(extracted["tds"].is_empty());
    }

    #[test]
    fn test_format_value_uses_precision() {
        assert_eq!(lookup("tds").unwrap().format_value(1.3), "1.30");
        assert_eq!(lookup("overall_score").unwrap().format_value(8.0), "8.0");
        assert_eq!(lookup("bloom_time").unwrap().format_value(44.6), "45");
    }
}
