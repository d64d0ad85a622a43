//! Data models for Brewlab

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single brew as supplied by the brew log.
///
/// `id`, `date` and `label` are lifted out for traceability; every other key
/// is kept untouched in `fields`. The analysis never mutates a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBrewRecord")]
pub struct BrewRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl BrewRecord {
    /// Create an empty record with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: None,
            label: None,
            fields: Map::new(),
        }
    }

    /// Set the brew date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the display label (usually the coffee name)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a raw field value
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Read a field as a finite number.
    ///
    /// Strings, booleans, nulls and absent fields are all `None`.
    pub fn numeric(&self, name: &str) -> Option<f64> {
        self.fields
            .get(name)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }
}

/// Wire form of a record: numeric ids are accepted, dates are parsed leniently
#[derive(Debug, Deserialize)]
struct RawBrewRecord {
    id: RawId,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl TryFrom<RawBrewRecord> for BrewRecord {
    type Error = String;

    fn try_from(raw: RawBrewRecord) -> Result<Self, Self::Error> {
        let id = match raw.id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        };
        if id.trim().is_empty() {
            return Err("brew record id must not be empty".to_string());
        }

        let date = match raw.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => {
                let parsed = parse_record_date(s);
                if parsed.is_none() {
                    tracing::warn!(record = %id, date = s, "Ignoring unparseable brew date");
                }
                parsed
            }
        };

        Ok(Self {
            id,
            date,
            label: raw.label,
            fields: raw.fields,
        })
    }
}

/// Parse a brew date given as `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// One extracted numeric value of a variable, tagged with its source record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSample {
    pub record_id: String,
    pub value: f64,
}

/// Desired value per outcome metric, keyed by metric name
pub type GoalTargets = BTreeMap<String, f64>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserializes_flat_fields() {
        let record: BrewRecord = serde_json::from_value(json!({
            "id": 42,
            "date": "2024-03-02",
            "label": "Ethiopia Guji",
            "water_temperature": 94,
            "grinder": "Comandante"
        }))
        .unwrap();

        assert_eq!(record.id, "42");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(record.label.as_deref(), Some("Ethiopia Guji"));
        assert_eq!(record.numeric("water_temperature"), Some(94.0));
        assert_eq!(record.numeric("grinder"), None);
        assert!(!record.fields.contains_key("id"));
    }

    #[test]
    fn test_record_accepts_rfc3339_date() {
        let record: BrewRecord = serde_json::from_value(json!({
            "id": "b1",
            "date": "2024-03-02T07:45:00Z"
        }))
        .unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 2));
    }

    #[test]
    fn test_record_bad_date_is_dropped() {
        let record: BrewRecord = serde_json::from_value(json!({
            "id": "b1",
            "date": "last tuesday"
        }))
        .unwrap();
        assert_eq!(record.date, None);
    }

    #[test]
    fn test_record_rejects_empty_id() {
        let result: std::result::Result<BrewRecord, _> =
            serde_json::from_value(json!({ "id": "  " }));
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_never_coerces() {
        let record = BrewRecord::new("b1")
            .with_field("dose", "18")
            .with_field("ratio", true)
            .with_field("tds", Value::Null)
            .with_field("bloom_time", 45);

        assert_eq!(record.numeric("dose"), None);
        assert_eq!(record.numeric("ratio"), None);
        assert_eq!(record.numeric("tds"), None);
        assert_eq!(record.numeric("missing"), None);
        assert_eq!(record.numeric("bloom_time"), Some(45.0));
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = BrewRecord::new("b1")
            .with_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
            .with_field("tds", 1.38);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "b1");
        assert_eq!(value["date"], "2024-01-05");
        assert_eq!(value["tds"], 1.38);
        assert!(value.get("label").is_none());
    }
}
