use core_types::{Strength, TrendDirection, TrendKind};
use serde::{Deserialize, Serialize};

/// The outcome of a trend fit.
///
/// `slope` and `intercept` always describe a line: the fitted line for `Linear`, the
/// line in log space for `Exponential` (so `slope` is the exponent `b`), and the linear
/// and constant coefficients for `Polynomial`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub kind: TrendKind,
    pub slope: f64,
    pub intercept: f64,
    /// Goodness of fit in `[0, 1]`; 0 for a flat series.
    pub r_squared: f64,
    pub direction: TrendDirection,
    pub strength: Strength,
    pub exponential: Option<ExponentialFit>,
    pub polynomial: Option<PolynomialFit>,
}

/// `y = coefficient_a · e^(exponent_b · x)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialFit {
    pub coefficient_a: f64,
    pub exponent_b: f64,
    /// Growth per unit of x, in percent: `(e^b − 1) · 100`.
    pub growth_rate_percent: f64,
}

/// `y = a·x² + b·x + c`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl TrendResult {
    /// Evaluates the fitted curve at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        match (self.kind, self.exponential, self.polynomial) {
            (TrendKind::Exponential, Some(exp), _) => {
                exp.coefficient_a * (exp.exponent_b * x).exp()
            }
            (TrendKind::Polynomial, _, Some(poly)) => poly.a * x * x + poly.b * x + poly.c,
            _ => self.intercept + self.slope * x,
        }
    }
}
