//! Goal-aware insight generation
//!
//! Combines goal trends with the correlation matrix into short "what to
//! change" and "what worked" messages. Metrics are visited in outcome catalog
//! order so identical input always yields identical output.

use serde::{Deserialize, Serialize};

use crate::config::INSIGHT_THRESHOLD;
use crate::correlation::{rank_key, CorrelationMatrix};
use crate::trends::MetricTrend;
use crate::variables::{Variable, OUTCOME_VARIABLES};

/// Kind of goal insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Something to adjust to close the gap to a goal
    Change,
    /// A goal reached or progress made
    Worked,
}

/// One goal insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightItem {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub metric: String,
    pub message: String,
    /// Input recommended for adjustment, change items only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl InsightItem {
    fn worked(metric: &str, message: String) -> Self {
        Self {
            kind: InsightKind::Worked,
            metric: metric.to_string(),
            message,
            input: None,
        }
    }
}

/// Generate goal insights with the default |r| threshold
pub fn generate(trends: &[MetricTrend], correlations: Option<&CorrelationMatrix>) -> Vec<InsightItem> {
    generate_with_threshold(trends, correlations, INSIGHT_THRESHOLD)
}

/// Generate goal insights.
///
/// Per metric with a target:
/// - goal met: one "worked" item, nothing else for that metric
/// - otherwise: a "change" item stating the gap, naming the most correlated
///   input (|r| >= threshold) and which way to move it when one exists, then a
///   "worked" item if the last move went toward the target
pub fn generate_with_threshold(
    trends: &[MetricTrend],
    correlations: Option<&CorrelationMatrix>,
    threshold: f64,
) -> Vec<InsightItem> {
    let mut items = Vec::new();

    for variable in OUTCOME_VARIABLES {
        let Some(trend) = trends.iter().find(|t| t.metric == variable.name) else {
            continue;
        };
        let Some(target) = trend.target else {
            continue;
        };
        let Some(latest) = trend.latest() else {
            continue;
        };

        if trend.target_met {
            items.push(InsightItem::worked(
                variable.name,
                format!(
                    "{} goal reached ({} / {})",
                    variable.name,
                    variable.format_value(latest),
                    variable.format_value(target)
                ),
            ));
            continue;
        }

        let gap = target - latest;
        let mut message = format!(
            "{} is {} {} target ({} / {})",
            variable.name,
            variable.format_value(gap.abs()),
            if gap > 0.0 { "below" } else { "above" },
            variable.format_value(latest),
            variable.format_value(target)
        );

        let suggestion = correlations.and_then(|m| strongest_input(m, variable, threshold));
        if let Some((input, r)) = suggestion {
            let direction = if (gap > 0.0 && r > 0.0) || (gap < 0.0 && r < 0.0) {
                "increasing"
            } else {
                "decreasing"
            };
            message.push_str(&format!("; try {} {} (r={:+.2})", direction, input, r));
        }

        items.push(InsightItem {
            kind: InsightKind::Change,
            metric: variable.name.to_string(),
            message,
            input: suggestion.map(|(input, _)| input.to_string()),
        });

        if let Some(improvement) = trend.improvement() {
            items.push(InsightItem::worked(
                variable.name,
                format!(
                    "{} improved from {} to {}",
                    variable.name,
                    variable.format_value(improvement.from),
                    variable.format_value(improvement.to)
                ),
            ));
        }
    }

    tracing::debug!(
        trends = trends.len(),
        items = items.len(),
        "Generated goal insights"
    );

    items
}

/// Input with the largest |r| >= threshold against the metric.
///
/// Ties keep the input that comes first in catalog order.
fn strongest_input(
    matrix: &CorrelationMatrix,
    metric: &Variable,
    threshold: f64,
) -> Option<(&'static str, f64)> {
    let mut best: Option<(&'static str, f64)> = None;
    for (input, cell) in matrix.column(metric.name) {
        let Some(result) = cell.result() else {
            continue;
        };
        if result.r.abs() < threshold {
            continue;
        }
        match best {
            Some((_, best_r)) if result.rank_key() <= rank_key(best_r) => {}
            _ => best = Some((input, result.r)),
        }
    }
    best
}
