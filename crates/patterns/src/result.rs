use core_types::{CorrelationDirection, Strength, TrendDirection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityInfo {
    /// Whether the seasonal component's variance exceeds the configured threshold.
    pub is_seasonal: bool,
    /// The candidate period with the highest positive autocorrelation, if any.
    pub period: Option<usize>,
    /// Autocorrelation of the detrended series at `period` (0 without a period).
    pub strength: f64,
    /// Population variance of the seasonal component.
    pub variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleInfo {
    /// Indices of strict local maxima.
    pub peaks: Vec<usize>,
    /// Indices of strict local minima.
    pub troughs: Vec<usize>,
    /// Mean distance between consecutive peaks; `None` with fewer than two peaks.
    pub average_cycle_length: Option<f64>,
}

/// A sudden shift between two consecutive observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepChange {
    /// Index of the first observation after the shift.
    pub index: usize,
    pub previous_value: f64,
    pub value: f64,
    /// Signed change, `value − previous_value`.
    pub change: f64,
    /// Change relative to `|previous_value|`, in percent; `None` when that is 0.
    pub percent_change: Option<f64>,
    /// Standard deviation of the trailing window the change was compared against.
    pub local_std_dev: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Pearson coefficient in `[-1, 1]`.
    pub correlation_coefficient: f64,
    /// Population covariance.
    pub covariance: f64,
    pub strength: Strength,
    pub direction: CorrelationDirection,
}
