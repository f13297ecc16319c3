use serde::{Deserialize, Serialize};
use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;

/// The overall direction of a fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Flat,
    /// Curved fits (degree 2) have no single direction.
    Complex,
}

impl TrendDirection {
    /// Classifies a slope. Only an exact zero counts as flat.
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            TrendDirection::Increasing
        } else if slope < 0.0 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Flat
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Flat => "flat",
            TrendDirection::Complex => "complex",
        };
        f.write_str(label)
    }
}

/// A qualitative bucket for a score in `[0, 1]` (R² or |r|).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strength {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl Strength {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Strength::VeryStrong
        } else if score >= 0.7 {
            Strength::Strong
        } else if score >= 0.5 {
            Strength::Moderate
        } else if score >= 0.3 {
            Strength::Weak
        } else {
            Strength::VeryWeak
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::VeryWeak => "very weak",
            Strength::Weak => "weak",
            Strength::Moderate => "moderate",
            Strength::Strong => "strong",
            Strength::VeryStrong => "very strong",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Medium => f.write_str("medium"),
            Severity::High => f.write_str("high"),
        }
    }
}

/// The sign of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationDirection {
    Positive,
    Negative,
    None,
}

impl CorrelationDirection {
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.0 {
            CorrelationDirection::Positive
        } else if r < 0.0 {
            CorrelationDirection::Negative
        } else {
            CorrelationDirection::None
        }
    }
}

impl fmt::Display for CorrelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CorrelationDirection::Positive => "positive",
            CorrelationDirection::Negative => "negative",
            CorrelationDirection::None => "none",
        };
        f.write_str(label)
    }
}

/// The family of curve fitted by the trend analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendKind {
    #[default]
    Linear,
    Exponential,
    /// Second-degree polynomial.
    Polynomial,
}

/// Identifies a forecasting model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastMethod {
    MovingAverage,
    ExponentialSmoothing,
    WeightedAverage,
    #[default]
    LinearRegression,
    /// Linear trend plus the repeating seasonal cycle from decomposition.
    Seasonal,
}

/// Identifies an outlier detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnomalyMethod {
    #[default]
    Statistical,
    Iqr,
    ZScore,
    Mad,
}

impl TrendKind {
    pub const ALL: [TrendKind; 3] = [TrendKind::Linear, TrendKind::Exponential, TrendKind::Polynomial];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendKind::Linear => "linear",
            TrendKind::Exponential => "exponential",
            TrendKind::Polynomial => "polynomial",
        }
    }
}

impl ForecastMethod {
    pub const ALL: [ForecastMethod; 5] = [
        ForecastMethod::MovingAverage,
        ForecastMethod::ExponentialSmoothing,
        ForecastMethod::WeightedAverage,
        ForecastMethod::LinearRegression,
        ForecastMethod::Seasonal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::MovingAverage => "moving-average",
            ForecastMethod::ExponentialSmoothing => "exponential-smoothing",
            ForecastMethod::WeightedAverage => "weighted-average",
            ForecastMethod::LinearRegression => "linear-regression",
            ForecastMethod::Seasonal => "seasonal",
        }
    }
}

impl AnomalyMethod {
    pub const ALL: [AnomalyMethod; 4] = [
        AnomalyMethod::Statistical,
        AnomalyMethod::Iqr,
        AnomalyMethod::ZScore,
        AnomalyMethod::Mad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyMethod::Statistical => "statistical",
            AnomalyMethod::Iqr => "iqr",
            AnomalyMethod::ZScore => "z-score",
            AnomalyMethod::Mad => "mad",
        }
    }
}

// The method enums share one naming scheme for configuration files and the CLI,
// so parsing and display are generated from `ALL` and `as_str`.
macro_rules! impl_method_names {
    ($($ty:ident => $what:literal),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = CoreError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
                    $ty::ALL
                        .iter()
                        .copied()
                        .find(|m| m.as_str() == wanted)
                        .ok_or_else(|| {
                            let known: Vec<&str> = $ty::ALL.iter().map(|m| m.as_str()).collect();
                            CoreError::UnknownName {
                                kind: $what,
                                name: s.to_string(),
                                expected: known.join(", "),
                            }
                        })
                }
            }
        )*
    };
}

impl_method_names!(
    TrendKind => "trend kind",
    ForecastMethod => "forecast method",
    AnomalyMethod => "anomaly method",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_buckets_follow_thresholds() {
        assert_eq!(Strength::from_score(0.95), Strength::VeryStrong);
        assert_eq!(Strength::from_score(0.9), Strength::VeryStrong);
        assert_eq!(Strength::from_score(0.7), Strength::Strong);
        assert_eq!(Strength::from_score(0.5), Strength::Moderate);
        assert_eq!(Strength::from_score(0.3), Strength::Weak);
        assert_eq!(Strength::from_score(0.29), Strength::VeryWeak);
        assert_eq!(Strength::from_score(0.0), Strength::VeryWeak);
    }

    #[test]
    fn direction_from_slope_sign() {
        assert_eq!(TrendDirection::from_slope(0.1), TrendDirection::Increasing);
        assert_eq!(TrendDirection::from_slope(-2.0), TrendDirection::Decreasing);
        assert_eq!(TrendDirection::from_slope(0.0), TrendDirection::Flat);
    }

    #[test]
    fn severity_orders_high_above_medium() {
        assert!(Severity::High > Severity::Medium);
    }

    #[test]
    fn method_names_round_trip_through_from_str() {
        for method in ForecastMethod::ALL {
            assert_eq!(method.to_string().parse::<ForecastMethod>().unwrap(), method);
        }
        for method in AnomalyMethod::ALL {
            assert_eq!(method.to_string().parse::<AnomalyMethod>().unwrap(), method);
        }
        assert_eq!("Z_SCORE".parse::<AnomalyMethod>().unwrap(), AnomalyMethod::ZScore);
        assert_eq!("polynomial".parse::<TrendKind>().unwrap(), TrendKind::Polynomial);
    }

    #[test]
    fn unknown_method_names_are_rejected() {
        let err = "arima".parse::<ForecastMethod>().unwrap_err();
        assert!(err.to_string().contains("linear-regression"));
    }
}
