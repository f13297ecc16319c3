use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A single observation in a chronologically ordered series.
///
/// `timestamp` is either unix seconds or an ordinal index; the analysis crates only rely
/// on its ordering and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    timestamp: i64,
    value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Like `new`, but rejects NaN and infinite values.
    ///
    /// The analysis crates assume finite input, so loaders at the edge of the system
    /// should construct points through this function.
    pub fn checked(timestamp: i64, value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() {
            return Err(CoreError::NonFiniteValue { timestamp, value });
        }
        Ok(Self::new(timestamp, value))
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Extracts the values of a series, in order.
pub fn values(points: &[TimeSeriesPoint]) -> Vec<f64> {
    points.iter().map(TimeSeriesPoint::value).collect()
}

/// Builds a series from bare values using the ordinal index as the timestamp.
pub fn from_values(values: &[f64]) -> Vec<TimeSeriesPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| TimeSeriesPoint::new(i as i64, v))
        .collect()
}

/// The spacing between consecutive observations.
///
/// Uses the median of the positive gaps so a single missing or duplicated observation
/// does not skew it. Falls back to 1 when no positive gap exists.
pub fn step(points: &[TimeSeriesPoint]) -> i64 {
    let mut gaps: Vec<i64> = points
        .windows(2)
        .map(|w| w[1].timestamp - w[0].timestamp)
        .filter(|gap| *gap > 0)
        .collect();

    if gaps.is_empty() {
        return 1;
    }

    gaps.sort_unstable();
    gaps[gaps.len() / 2]
}
