use crate::error::ConfigError;
use core_types::{AnomalyMethod, ForecastMethod};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// The root configuration structure: one sensitivity profile for every analysis.
///
/// Every section may be omitted from the file, in which case its defaults apply.
/// The parameter structs are handed to the analysis functions explicitly, so several
/// profiles can be used side by side in the same process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub anomaly: AnomalyParams,
    pub forecast: ForecastParams,
    pub seasonality: SeasonalityParams,
    pub step_changes: StepChangeParams,
}

/// Thresholds for the four anomaly detection methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyParams {
    /// Method used when the caller does not pick one.
    pub default_method: AnomalyMethod,
    /// Number of standard deviations for the `statistical` method.
    pub sensitivity: f64,
    /// Fence multiplier for the `iqr` method.
    pub iqr_multiplier: f64,
    pub z_score_threshold: f64,
    /// Score each point against the other points only.
    pub z_score_leave_one_out: bool,
    pub mad_threshold: f64,
}

impl Default for AnomalyParams {
    fn default() -> Self {
        Self {
            default_method: AnomalyMethod::Statistical,
            sensitivity: 2.0,
            iqr_multiplier: 1.5,
            z_score_threshold: 3.0,
            z_score_leave_one_out: true,
            mad_threshold: 3.5,
        }
    }
}

/// Parameters for the forecasting models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastParams {
    pub default_method: ForecastMethod,
    pub moving_average_window: usize,
    /// Smoothing factor α, in (0, 1].
    pub smoothing_alpha: f64,
    pub weighted_window: usize,
    /// Level of the regression-based intervals, strictly between 0 and 1.
    pub confidence_level: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            default_method: ForecastMethod::LinearRegression,
            moving_average_window: 7,
            smoothing_alpha: 0.3,
            weighted_window: 5,
            confidence_level: 0.95,
        }
    }
}

impl ForecastParams {
    /// The two-sided standard normal critical value for `confidence_level`, or `None`
    /// when the level is outside (0, 1).
    pub fn z_value(&self) -> Option<f64> {
        let level = self.confidence_level;
        if !(level > 0.0 && level < 1.0) {
            return None;
        }
        let normal = Normal::new(0.0, 1.0).ok()?;
        let alpha = 1.0 - level;
        Some(normal.inverse_cdf(1.0 - alpha / 2.0))
    }
}

/// Known business cycles to test during decomposition and seasonality detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalityParams {
    /// Candidate periods, in observations (7 = weekly and 30 = monthly for daily data).
    pub candidate_periods: Vec<usize>,
    /// Period used when no candidate can be evaluated or none correlates positively.
    pub default_period: usize,
    /// Seasonal component variance above which a series counts as seasonal.
    pub strength_threshold: f64,
    pub min_points: usize,
}

impl Default for SeasonalityParams {
    fn default() -> Self {
        Self {
            candidate_periods: vec![7, 30],
            default_period: 7,
            strength_threshold: 0.3,
            min_points: core_types::limits::MIN_POINTS_SEASONALITY,
        }
    }
}

/// Parameters for step-change (level shift) detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepChangeParams {
    /// Number of trailing observations used for the local standard deviation.
    pub window: usize,
    /// Multiple of the local standard deviation a jump must exceed.
    pub threshold: f64,
}

impl Default for StepChangeParams {
    fn default() -> Self {
        Self {
            window: 10,
            threshold: 2.0,
        }
    }
}

impl AnalysisConfig {
    /// Checks every section, reporting the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.anomaly.validate()?;
        self.forecast.validate()?;
        self.seasonality.validate()?;
        self.step_changes.validate()
    }
}

impl AnomalyParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("anomaly.sensitivity", self.sensitivity)?;
        require_positive("anomaly.iqr_multiplier", self.iqr_multiplier)?;
        require_positive("anomaly.z_score_threshold", self.z_score_threshold)?;
        require_positive("anomaly.mad_threshold", self.mad_threshold)
    }
}

impl ForecastParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.moving_average_window == 0 || self.weighted_window == 0 {
            return Err(ConfigError::ValidationError(
                "forecast windows must be at least 1".to_string(),
            ));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "forecast.smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        if self.z_value().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "forecast.confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        Ok(())
    }
}

impl SeasonalityParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidate_periods.is_empty() {
            return Err(ConfigError::ValidationError(
                "seasonality.candidate_periods must not be empty".to_string(),
            ));
        }
        if let Some(p) = self.candidate_periods.iter().find(|p| **p < 2) {
            return Err(ConfigError::ValidationError(format!(
                "seasonality.candidate_periods entries must be at least 2, got {}",
                p
            )));
        }
        if self.default_period < 2 {
            return Err(ConfigError::ValidationError(
                "seasonality.default_period must be at least 2".to_string(),
            ));
        }
        if self.min_points == 0 {
            return Err(ConfigError::ValidationError(
                "seasonality.min_points must be at least 1".to_string(),
            ));
        }
        if self.strength_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "seasonality.strength_threshold cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl StepChangeParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window < 2 {
            return Err(ConfigError::ValidationError(
                "step_changes.window must be at least 2".to_string(),
            ));
        }
        require_positive("step_changes.threshold", self.threshold)
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}
