//! Goal trend tracking
//!
//! For one outcome metric: the dated history of values, whether the latest
//! value meets the user's target, and whether the last move went toward it.
//!
//! Scale metrics (sensory intensities, overall score) meet a target once the
//! latest value reaches it. Continuous metrics (TDS, extraction yield) are
//! measured quantities and must land within a tolerance of the target.

use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::models::{BrewRecord, GoalTargets};
use crate::variables::{self, MetricScale, VariableKind, OUTCOME_VARIABLES};

/// One dated value of a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Movement between the last two values, reported when it heads toward the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub from: f64,
    pub to: f64,
}

/// History and goal status of one metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTrend {
    pub metric: String,
    pub target: Option<f64>,
    /// Ascending by date
    pub values: Vec<TrendPoint>,
    pub target_met: bool,
}

impl MetricTrend {
    pub fn latest(&self) -> Option<f64> {
        self.values.last().map(|p| p.value)
    }

    pub fn previous(&self) -> Option<f64> {
        self.values
            .len()
            .checked_sub(2)
            .map(|i| self.values[i].value)
    }

    /// target - latest
    pub fn gap(&self) -> Option<f64> {
        Some(self.target? - self.latest()?)
    }

    /// Whether the last move went toward the target.
    ///
    /// `None` without a target, with fewer than two values, or when the
    /// latest value sits exactly on the target.
    pub fn is_improving(&self) -> Option<bool> {
        let gap = self.gap()?;
        let latest = self.latest()?;
        let previous = self.previous()?;
        if gap > 0.0 {
            Some(latest > previous)
        } else if gap < 0.0 {
            Some(latest < previous)
        } else {
            None
        }
    }

    /// The last move, if it went toward the target
    pub fn improvement(&self) -> Option<Improvement> {
        match self.is_improving() {
            Some(true) => Some(Improvement {
                from: self.previous()?,
                to: self.latest()?,
            }),
            _ => None,
        }
    }
}

/// The derived readings (`latest`, `previous`, `gap`, `improvement`) go on
/// the wire next to the stored fields.
impl Serialize for MetricTrend {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MetricTrend", 8)?;
        state.serialize_field("metric", &self.metric)?;
        state.serialize_field("target", &self.target)?;
        state.serialize_field("values", &self.values)?;
        state.serialize_field("target_met", &self.target_met)?;
        state.serialize_field("latest", &self.latest())?;
        state.serialize_field("previous", &self.previous())?;
        state.serialize_field("gap", &self.gap())?;
        state.serialize_field("improvement", &self.improvement())?;
        state.end()
    }
}

/// Whether `latest` satisfies `target` for the given metric
pub fn target_met(metric: &str, latest: f64, target: f64, config: &AnalysisConfig) -> Result<bool> {
    let variable = variables::lookup_kind(metric, VariableKind::Outcome)?;
    let met = match variable.scale {
        Some(MetricScale::Continuous) => {
            let tolerance = config.tolerance_for(metric).unwrap_or(0.0);
            (latest - target).abs() <= tolerance
        }
        _ => latest >= target,
    };
    Ok(met)
}

/// Build the trend of one outcome metric.
///
/// The history is sorted by date here (stable, so same-day values keep
/// caller order); non-finite values are dropped.
pub fn track(
    metric: &str,
    history: &[(NaiveDate, f64)],
    target: Option<f64>,
    config: &AnalysisConfig,
) -> Result<MetricTrend> {
    let variable = variables::lookup_kind(metric, VariableKind::Outcome)?;
    if let Some(target) = target {
        if !target.is_finite() {
            return Err(Error::InvalidRequest(format!(
                "target for {} must be a finite number",
                metric
            )));
        }
    }

    let mut values: Vec<TrendPoint> = history
        .iter()
        .filter(|(_, value)| value.is_finite())
        .map(|&(date, value)| TrendPoint { date, value })
        .collect();
    values.sort_by_key(|p| p.date);

    let target_met = match (target, values.last()) {
        (Some(target), Some(latest)) => target_met(metric, latest.value, target, config)?,
        _ => false,
    };

    Ok(MetricTrend {
        metric: variable.name.to_string(),
        target,
        values,
        target_met,
    })
}

/// Dated history of a metric across records, in record order.
///
/// Records without a date or without a numeric value are skipped.
pub fn history_from_records(records: &[BrewRecord], metric: &str) -> Vec<(NaiveDate, f64)> {
    records
        .iter()
        .filter_map(|record| Some((record.date?, record.numeric(metric)?)))
        .collect()
}

/// Trends for every goal metric, in outcome catalog order
pub fn trends_from_records(
    records: &[BrewRecord],
    goals: &GoalTargets,
    config: &AnalysisConfig,
) -> Result<Vec<MetricTrend>> {
    validate_goals(goals)?;

    let trends = OUTCOME_VARIABLES
        .iter()
        .filter_map(|variable| goals.get(variable.name).map(|target| (variable, *target)))
        .map(|(variable, target)| {
            let history = history_from_records(records, variable.name);
            track(variable.name, &history, Some(target), config)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(goals = goals.len(), trends = trends.len(), "Tracked goal metrics");
    Ok(trends)
}

/// Every goal must name an outcome metric
pub fn validate_goals(goals: &GoalTargets) -> Result<()> {
    for metric in goals.keys() {
        variables::lookup_kind(metric, VariableKind::Outcome)?;
    }
    Ok(())
}
