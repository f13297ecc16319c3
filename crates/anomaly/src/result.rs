use core_types::{AnomalyMethod, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The outcome of one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub method: AnomalyMethod,
    pub total_points: usize,
    pub anomalies: Vec<AnomalyRecord>,
    /// Thresholds and reference statistics used by the method.
    pub parameters: BTreeMap<String, f64>,
    /// Set when the input was degenerate (e.g. zero variance) and detection was skipped.
    pub note: Option<String>,
}

impl AnomalyResult {
    pub fn anomaly_count(&self) -> usize {
        self.anomalies.len()
    }

    /// Indices of the flagged observations.
    pub fn indices(&self) -> Vec<usize> {
        self.anomalies.iter().map(|a| a.index).collect()
    }
}

/// A single flagged observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub index: usize,
    pub timestamp: i64,
    pub value: f64,
    pub metric: DeviationMetric,
    pub severity: Severity,
    pub expected_range: Option<ExpectedRange>,
}

/// How far an observation lies from normal, in the unit of the detecting method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DeviationMetric {
    ZScore(f64),
    ModifiedZScore(f64),
    /// Raw distance (from the mean, or past the violated fence for IQR).
    Deviation(f64),
}

impl DeviationMetric {
    pub fn value(&self) -> f64 {
        match *self {
            DeviationMetric::ZScore(v)
            | DeviationMetric::ModifiedZScore(v)
            | DeviationMetric::Deviation(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRange {
    pub lower: f64,
    pub upper: f64,
}
