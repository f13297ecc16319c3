use serde::{Deserialize, Serialize};

/// An additive decomposition. All four series have the length of the input and
/// `original[i] == trend[i] + seasonal[i] + residual[i]` up to rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionResult {
    pub original: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
    /// Length of the seasonal cycle used.
    pub period: usize,
    /// One centred seasonal cycle; `seasonal[i] == seasonal_cycle[i % period]`.
    pub seasonal_cycle: Vec<f64>,
    /// Autocorrelation of the detrended series at `period`.
    pub autocorrelation: f64,
}

impl DecompositionResult {
    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// The input with the trend removed.
    pub fn detrended(&self) -> Vec<f64> {
        self.original
            .iter()
            .zip(&self.trend)
            .map(|(o, t)| o - t)
            .collect()
    }

    /// The input with the seasonal component removed.
    pub fn seasonally_adjusted(&self) -> Vec<f64> {
        self.original
            .iter()
            .zip(&self.seasonal)
            .map(|(o, s)| o - s)
            .collect()
    }
}
