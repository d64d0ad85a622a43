//! Analysis entry points
//!
//! `Analyzer` wires extraction, the correlation engine, ranking, trend
//! tracking and goal insights together into the three request shapes served
//! to callers: the full matrix, one pair in detail, and goal progress.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::correlation::{CorrelationMatrix, CorrelationResult};
use crate::detail::{self, ScatterPoint};
use crate::error::Result;
use crate::generator::{self, InsightItem};
use crate::models::{BrewRecord, GoalTargets};
use crate::ranking::{self, CorrelationInsight, DataWarning};
use crate::trends::{self, MetricTrend};
use crate::variables;

/// Matrix mode response
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub correlations: CorrelationMatrix,
    pub inputs: Vec<&'static str>,
    pub outcomes: Vec<&'static str>,
    pub record_count: usize,
    pub record_ids: Vec<String>,
    pub insights: Vec<CorrelationInsight>,
    pub warnings: Vec<DataWarning>,
}

/// A record behind one scatter point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input_value: f64,
    pub outcome_value: f64,
}

/// Detail mode response
#[derive(Debug, Clone, Serialize)]
pub struct DetailReport {
    pub input_variable: String,
    pub outcome_variable: String,
    pub correlation: CorrelationResult,
    pub scatter_data: Vec<ScatterPoint>,
    pub insight: String,
    pub records: Vec<DetailRecord>,
}

/// Goal progress response
#[derive(Debug, Clone, Serialize)]
pub struct GoalReport {
    pub trends: Vec<MetricTrend>,
    pub insights: Vec<InsightItem>,
}

/// Runs analyses with one configuration
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Correlate every input against every outcome and rank the results
    pub fn analyze(&self, records: &[BrewRecord], min_samples: Option<usize>) -> Result<AnalysisReport> {
        let config = self.config.with_min_samples(min_samples)?;
        let matrix = CorrelationMatrix::from_records(records, config.min_samples);
        let ranking =
            ranking::rank_with_threshold(&matrix, config.min_samples, config.insight_threshold);

        info!(
            records = records.len(),
            insights = ranking.insights.len(),
            warnings = ranking.warnings.len(),
            "Analysis complete"
        );

        Ok(AnalysisReport {
            inputs: matrix.inputs().to_vec(),
            outcomes: matrix.outcomes().to_vec(),
            correlations: matrix,
            record_count: records.len(),
            record_ids: records.iter().map(|r| r.id.clone()).collect(),
            insights: ranking.insights,
            warnings: ranking.warnings,
        })
    }

    /// Scatter detail for one (input, outcome) pair
    pub fn detail(
        &self,
        records: &[BrewRecord],
        input: &str,
        outcome: &str,
        min_samples: Option<usize>,
    ) -> Result<DetailReport> {
        let config = self.config.with_min_samples(min_samples)?;
        let samples = variables::extract(records, &[input, outcome])?;
        let input_variable = variables::lookup(input)?;
        let outcome_variable = variables::lookup(outcome)?;
        let empty = Vec::new();

        let pair = detail::project(
            samples.get(input_variable.name).unwrap_or(&empty),
            samples.get(outcome_variable.name).unwrap_or(&empty),
            input,
            outcome,
            config.min_samples,
        )?;

        let detail_records = pair
            .scatter_data
            .iter()
            .filter_map(|point| {
                let record = records.iter().find(|r| r.id == point.record_id)?;
                Some(DetailRecord {
                    id: record.id.clone(),
                    date: record.date,
                    label: record.label.clone(),
                    input_value: point.x,
                    outcome_value: point.y,
                })
            })
            .collect();

        debug!(
            input,
            outcome,
            points = pair.scatter_data.len(),
            r = pair.correlation.r,
            "Pair detail computed"
        );

        Ok(DetailReport {
            input_variable: pair.input_variable,
            outcome_variable: pair.outcome_variable,
            correlation: pair.correlation,
            scatter_data: pair.scatter_data,
            insight: pair.insight,
            records: detail_records,
        })
    }

    /// Goal trends plus change/worked insights.
    ///
    /// With `correlate`, change items name the input most correlated with
    /// each lagging metric.
    pub fn goals(&self, records: &[BrewRecord], goals: &GoalTargets, correlate: bool) -> Result<GoalReport> {
        let trends = trends::trends_from_records(records, goals, &self.config)?;
        let matrix =
            correlate.then(|| CorrelationMatrix::from_records(records, self.config.min_samples));
        let insights = generator::generate_with_threshold(
            &trends,
            matrix.as_ref(),
            self.config.insight_threshold,
        );

        info!(
            goals = goals.len(),
            met = trends.iter().filter(|t| t.target_met).count(),
            insights = insights.len(),
            "Goal evaluation complete"
        );

        Ok(GoalReport { trends, insights })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::generator::InsightKind;

    fn brews() -> Vec<BrewRecord> {
        let temps = [90.0, 92.0, 94.0, 96.0, 98.0, 93.0];
        let scores = [5.0, 6.0, 7.0, 8.0, 9.0, 6.0];
        temps
            .iter()
            .zip(scores)
            .enumerate()
            .map(|(i, (temp, score))| {
                BrewRecord::new(format!("b{}", i + 1))
                    .with_date(NaiveDate::from_ymd_opt(2024, 5, i as u32 + 1).unwrap())
                    .with_label("Guji")
                    .with_field("water_temperature", *temp)
                    .with_field("overall_score", score)
            })
            .collect()
    }

    #[test]
    fn test_analyze_report() {
        let analyzer = Analyzer::default();
        let report = analyzer.analyze(&brews(), None).unwrap();

        assert_eq!(report.record_count, 6);
        assert_eq!(report.record_ids[0], "b1");
        assert_eq!(report.inputs.len(), 10);
        assert_eq!(report.outcomes.len(), 12);
        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insights[0].input, "water_temperature");
        assert!(report.warnings.is_empty());
        assert!(report
            .correlations
            .result("water_temperature", "overall_score")
            .is_some());
    }

    #[test]
    fn test_analyze_min_samples_override() {
        let analyzer = Analyzer::default();
        let report = analyzer.analyze(&brews(), Some(10)).unwrap();
        assert!(report.insights.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].required, 10);

        assert!(matches!(
            analyzer.analyze(&brews(), Some(1)),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_analyze_json_shape() {
        let report = Analyzer::default().analyze(&brews(), None).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["correlations"]["water_temperature"]["overall_score"]["r"].is_number());
        assert!(json["correlations"]["ratio"]["tds"].is_null());
        assert_eq!(json["record_count"], 6);
    }

    #[test]
    fn test_detail_report() {
        let report = Analyzer::default()
            .detail(&brews(), "water_temperature", "overall_score", None)
            .unwrap();

        assert_eq!(report.scatter_data.len(), 6);
        assert_eq!(report.records.len(), 6);
        assert_eq!(report.records[0].id, "b1");
        assert_eq!(report.records[0].label.as_deref(), Some("Guji"));
        assert_eq!(report.records[0].input_value, 90.0);
        assert_eq!(report.records[0].outcome_value, 5.0);
        assert!(report.insight.starts_with("Very strong positive relationship"));
    }

    #[test]
    fn test_detail_errors_are_distinct() {
        let analyzer = Analyzer::default();
        let records = brews();

        assert!(matches!(
            analyzer.detail(&records, "altitude", "overall_score", None),
            Err(Error::UnknownVariable(_))
        ));
        assert!(matches!(
            analyzer.detail(&records[..3], "water_temperature", "overall_score", None),
            Err(Error::InsufficientData { found: 3, .. })
        ));
        assert!(matches!(
            analyzer.detail(&records, "ratio", "overall_score", None),
            Err(Error::InsufficientData { found: 0, .. })
        ));
    }

    #[test]
    fn test_goals_report() {
        let mut goals = GoalTargets::new();
        goals.insert("overall_score".to_string(), 9.5);

        let report = Analyzer::default().goals(&brews(), &goals, true).unwrap();
        assert_eq!(report.trends.len(), 1);
        assert_eq!(report.trends[0].latest(), Some(6.0));
        assert!(!report.trends[0].target_met);

        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insights[0].kind, InsightKind::Change);
        assert_eq!(report.insights[0].input.as_deref(), Some("water_temperature"));
        assert!(report.insights[0].message.contains("try increasing water_temperature"));
    }

    #[test]
    fn test_goals_without_correlation() {
        let mut goals = GoalTargets::new();
        goals.insert("overall_score".to_string(), 9.5);

        let report = Analyzer::default().goals(&brews(), &goals, false).unwrap();
        assert_eq!(report.insights[0].input, None);
    }
}
