use core_types::ForecastMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point forecasts for `periods` future steps and their band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub method: ForecastMethod,
    pub periods: usize,
    /// Timestamps of the forecast steps, one series step apart.
    pub timestamps: Vec<i64>,
    pub forecasts: Vec<f64>,
    pub confidence_interval: ConfidenceInterval,
    /// Effective model parameters (window, alpha, slope, ...).
    pub parameters: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Confidence level of a model-based interval; `None` for heuristic bands.
    pub level: Option<f64>,
}
