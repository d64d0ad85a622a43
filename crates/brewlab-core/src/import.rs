//! Brew record and goal loading
//!
//! The brew log lives elsewhere; these helpers read its JSON or CSV exports.
//! CSV cells carry no types, so numeric-looking cells are turned into numbers
//! here. Extraction itself never coerces strings.

use std::fs;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{parse_record_date, BrewRecord, GoalTargets};
use crate::trends::validate_goals;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(RecordFormat::Json),
            Some("csv") => Ok(RecordFormat::Csv),
            _ => Err(Error::Import(format!(
                "Unsupported file type: {} (expected .json or .csv)",
                path.display()
            ))),
        }
    }
}

/// Load brew records from a `.json` or `.csv` file
pub fn load_records(path: &Path) -> Result<Vec<BrewRecord>> {
    let format = RecordFormat::from_path(path)?;
    let records = match format {
        RecordFormat::Json => parse_json_records(&fs::read_to_string(path)?)?,
        RecordFormat::Csv => parse_csv_records(fs::File::open(path)?)?,
    };
    debug!(path = %path.display(), records = records.len(), "Loaded brew records");
    Ok(records)
}

/// Parse a JSON array of records, or an object with a `records` array
pub fn parse_json_records(content: &str) -> Result<Vec<BrewRecord>> {
    let value: Value = serde_json::from_str(content)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("records") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::Import(
                    "Expected an array of brews or an object with a \"records\" array".into(),
                ))
            }
        },
        _ => return Err(Error::Import("Expected an array of brews".into())),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| Error::Import(format!("Brew {}: {}", i + 1, e)))
        })
        .collect()
}

/// Parse a CSV export. The header row names the fields and must include `id`.
pub fn parse_csv_records<R: Read>(reader: R) -> Result<Vec<BrewRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if !headers.iter().any(|h| h == "id") {
        return Err(Error::Import("CSV header has no id column".into()));
    }

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        records.push(row_to_record(&headers, &row, i + 1));
    }

    debug!("Parsed {} brews from CSV", records.len());
    Ok(records)
}

fn row_to_record(headers: &StringRecord, row: &StringRecord, row_number: usize) -> BrewRecord {
    let mut id = None;
    let mut date = None;
    let mut label = None;
    let mut fields = Map::new();

    for (header, cell) in headers.iter().zip(row.iter()) {
        if cell.is_empty() {
            continue;
        }
        match header {
            "id" => id = Some(cell.to_string()),
            "date" => {
                date = parse_record_date(cell);
                if date.is_none() {
                    warn!(row = row_number, date = cell, "Ignoring unparseable brew date");
                }
            }
            "label" => label = Some(cell.to_string()),
            _ => {
                fields.insert(header.to_string(), cell_value(cell));
            }
        }
    }

    BrewRecord {
        id: id.unwrap_or_else(|| format!("row-{}", row_number)),
        date,
        label,
        fields,
    }
}

/// Finite numbers become JSON numbers, everything else stays text
fn cell_value(cell: &str) -> Value {
    if let Ok(n) = cell.parse::<i64>() {
        return Value::from(n);
    }
    match cell.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::from(n),
        _ => Value::String(cell.to_string()),
    }
}

/// Parse goals from a JSON object of `{ metric: target }`
pub fn parse_goals_json(content: &str) -> Result<GoalTargets> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Object(object) = value else {
        return Err(Error::InvalidRequest(
            "Goals must be an object of metric: target".into(),
        ));
    };

    let mut goals = GoalTargets::new();
    for (metric, target) in object {
        let target = target
            .as_f64()
            .filter(|t| t.is_finite())
            .ok_or_else(|| Error::InvalidRequest(format!("Goal for {} must be a number", metric)))?;
        goals.insert(metric, target);
    }

    validate_goals(&goals)?;
    Ok(goals)
}

/// Parse goals from `metric=value` pairs
pub fn parse_goal_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<GoalTargets> {
    let mut goals = GoalTargets::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (metric, target) = pair
            .split_once('=')
            .ok_or_else(|| Error::InvalidRequest(format!("Expected metric=value, got {}", pair)))?;
        let target: f64 = target
            .trim()
            .parse()
            .ok()
            .filter(|t: &f64| t.is_finite())
            .ok_or_else(|| Error::InvalidRequest(format!("Invalid goal value: {}", pair)))?;
        goals.insert(metric.trim().to_string(), target);
    }

    validate_goals(&goals)?;
    Ok(goals)
}
