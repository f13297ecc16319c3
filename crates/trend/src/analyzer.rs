use crate::error::TrendError;
use crate::result::{ExponentialFit, PolynomialFit, TrendResult};
use crate::solver::least_squares_quadratic;
use core_types::limits::MIN_POINTS_TREND;
use core_types::{Strength, TimeSeriesPoint, TrendDirection, TrendKind};

/// A stateless least-squares trend fitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendAnalyzer;

/// Slope, intercept and R² of an ordinary least squares line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LineFit {
    slope: f64,
    intercept: f64,
    r_squared: f64,
}

impl TrendAnalyzer {
    /// Fits a trend of the requested `kind` through the pairs `(x[i], y[i])`.
    ///
    /// # Errors
    ///
    /// * `InvalidParameters` if `x` and `y` differ in length.
    /// * `InsufficientData` if there are fewer than two pairs.
    pub fn fit(x: &[f64], y: &[f64], kind: TrendKind) -> Result<TrendResult, TrendError> {
        if x.len() != y.len() {
            return Err(TrendError::InvalidParameters(format!(
                "x and y must have the same length, got {} and {}",
                x.len(),
                y.len()
            )));
        }
        if x.len() < MIN_POINTS_TREND {
            return Err(TrendError::InsufficientData {
                required: MIN_POINTS_TREND,
                actual: x.len(),
            });
        }

        let result = match kind {
            TrendKind::Linear => Self::fit_linear(x, y),
            TrendKind::Exponential => Self::fit_exponential(x, y),
            TrendKind::Polynomial => Self::fit_polynomial(x, y),
        };
        Ok(result)
    }

    /// Fits a trend against the ordinal position (0, 1, 2, ...) of each point.
    pub fn fit_series(
        points: &[TimeSeriesPoint],
        kind: TrendKind,
    ) -> Result<TrendResult, TrendError> {
        let x: Vec<f64> = (0..points.len()).map(|i| i as f64).collect();
        let y = core_types::values(points);
        Self::fit(&x, &y, kind)
    }

    fn fit_linear(x: &[f64], y: &[f64]) -> TrendResult {
        let line = least_squares_line(x, y);
        TrendResult {
            kind: TrendKind::Linear,
            slope: line.slope,
            intercept: line.intercept,
            r_squared: line.r_squared,
            direction: TrendDirection::from_slope(line.slope),
            strength: Strength::from_score(line.r_squared),
            exponential: None,
            polynomial: None,
        }
    }

    /// Fits `ln y = ln a + b·x`.
    ///
    /// Known limitation: `ln y` is undefined for `y ≤ 0`, and such values are mapped
    /// to `ln y = 0` (as if `y` were 1) instead of producing NaN.
    fn fit_exponential(x: &[f64], y: &[f64]) -> TrendResult {
        let log_y: Vec<f64> = y
            .iter()
            .map(|&v| if v > 0.0 { v.ln() } else { 0.0 })
            .collect();
        let line = least_squares_line(x, &log_y);

        TrendResult {
            kind: TrendKind::Exponential,
            slope: line.slope,
            intercept: line.intercept,
            r_squared: line.r_squared,
            direction: TrendDirection::from_slope(line.slope),
            strength: Strength::from_score(line.r_squared),
            exponential: Some(ExponentialFit {
                coefficient_a: line.intercept.exp(),
                exponent_b: line.slope,
                growth_rate_percent: (line.slope.exp() - 1.0) * 100.0,
            }),
            polynomial: None,
        }
    }

    /// Fits `y = a·x² + b·x + c` by least squares.
    ///
    /// With fewer than three distinct x values the quadratic term is not identifiable;
    /// the fit then degrades to the least squares line with `a = 0`.
    fn fit_polynomial(x: &[f64], y: &[f64]) -> TrendResult {
        let (coefficients, predictions) = least_squares_quadratic(x, y).unwrap_or_else(|| {
            let line = least_squares_line(x, y);
            let predictions = x.iter().map(|xi| line.intercept + line.slope * xi).collect();
            let coefficients = PolynomialFit {
                a: 0.0,
                b: line.slope,
                c: line.intercept,
            };
            (coefficients, predictions)
        });
        let r_squared = r_squared(y, &predictions);

        TrendResult {
            kind: TrendKind::Polynomial,
            slope: coefficients.b,
            intercept: coefficients.c,
            r_squared,
            direction: TrendDirection::Complex,
            strength: Strength::from_score(r_squared),
            exponential: None,
            polynomial: Some(coefficients),
        }
    }
}

/// OLS line in centred form, algebraically identical to
/// `m = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)` but without the cancellation of the raw sums.
fn least_squares_line(x: &[f64], y: &[f64]) -> LineFit {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    // A constant series is flat by definition; do not let rounding in the mean invent
    // a slope.
    if y.iter().all(|v| *v == y[0]) {
        return LineFit {
            slope: 0.0,
            intercept: y[0],
            r_squared: 0.0,
        };
    }

    let sxx: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return LineFit {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
        };
    }

    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let predictions: Vec<f64> = x.iter().map(|xi| intercept + slope * xi).collect();
    LineFit {
        slope,
        intercept,
        r_squared: r_squared(y, &predictions),
    }
}

/// `1 − SS_res / SS_tot`, defined as 0 when `SS_tot` is 0 and clamped to `[0, 1]`.
fn r_squared(y: &[f64], predictions: &[f64]) -> f64 {
    let mean_y = y.iter().sum::<f64>() / y.len() as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = y
        .iter()
        .zip(predictions)
        .map(|(v, p)| (v - p).powi(2))
        .sum();
    (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn xs(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn recovers_exact_linear_trend() {
        let x = xs(10);
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();
        let fit = TrendAnalyzer::fit(&x, &y, TrendKind::Linear).unwrap();

        assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.intercept, 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.r_squared, 1.0, epsilon = 1e-10);
        assert_eq!(fit.direction, TrendDirection::Increasing);
        assert_eq!(fit.strength, Strength::VeryStrong);
        assert_abs_diff_eq!(fit.predict(12.0), 27.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_series_has_zero_r_squared() {
        let x = xs(6);
        let y = vec![0.1; 6];
        let fit = TrendAnalyzer::fit(&x, &y, TrendKind::Linear).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 0.1);
        assert_eq!(fit.r_squared, 0.0);
        assert_eq!(fit.direction, TrendDirection::Flat);
        assert_eq!(fit.strength, Strength::VeryWeak);
    }

    #[test]
    fn identical_x_values_give_zero_slope() {
        let fit = TrendAnalyzer::fit(&[3.0, 3.0, 3.0], &[1.0, 2.0, 6.0], TrendKind::Linear)
            .unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 3.0);
        assert!(!fit.r_squared.is_nan());
    }

    #[test]
    fn decreasing_trend_is_classified() {
        let x = xs(5);
        let y = vec![10.0, 8.0, 6.5, 4.0, 2.0];
        let fit = TrendAnalyzer::fit(&x, &y, TrendKind::Linear).unwrap();
        assert!(fit.slope < 0.0);
        assert_eq!(fit.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn exponential_fit_recovers_growth_rate() {
        let x = xs(8);
        let y: Vec<f64> = x.iter().map(|v| 5.0 * (0.1 * v).exp()).collect();
        let fit = TrendAnalyzer::fit(&x, &y, TrendKind::Exponential).unwrap();
        let exp = fit.exponential.unwrap();

        assert_abs_diff_eq!(exp.coefficient_a, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(exp.exponent_b, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(exp.growth_rate_percent, (0.1f64.exp() - 1.0) * 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.predict(3.0), 5.0 * 0.3f64.exp(), epsilon = 1e-9);
        assert_eq!(fit.direction, TrendDirection::Increasing);
    }

    #[test]
    fn exponential_fit_tolerates_non_positive_values() {
        let fit = TrendAnalyzer::fit(&xs(4), &[0.0, -2.0, 3.0, 9.0], TrendKind::Exponential)
            .unwrap();
        assert!(fit.slope.is_finite());
        assert!(fit.r_squared.is_finite());
    }

    #[test]
    fn polynomial_fit_recovers_quadratic() {
        let x = xs(12);
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v * v - 3.0 * v + 7.0).collect();
        let fit = TrendAnalyzer::fit(&x, &y, TrendKind::Polynomial).unwrap();
        let poly = fit.polynomial.unwrap();

        assert_abs_diff_eq!(poly.a, 0.5, epsilon = 1e-8);
        assert_abs_diff_eq!(poly.b, -3.0, epsilon = 1e-8);
        assert_abs_diff_eq!(poly.c, 7.0, epsilon = 1e-8);
        assert_abs_diff_eq!(fit.r_squared, 1.0, epsilon = 1e-10);
        assert_eq!(fit.direction, TrendDirection::Complex);
        assert_abs_diff_eq!(fit.predict(20.0), 147.0, epsilon = 1e-6);
    }

    #[test]
    fn polynomial_fit_on_unix_second_timestamps() {
        let day = 86_400.0;
        let x: Vec<f64> = (0..30).map(|i| 1.7e9 + i as f64 * day).collect();
        let y: Vec<f64> = (0..30)
            .map(|i| {
                let i = i as f64;
                0.5 * i * i - 3.0 * i + 7.0
            })
            .collect();
        let fit = TrendAnalyzer::fit(&x, &y, TrendKind::Polynomial).unwrap();
        let poly = fit.polynomial.unwrap();

        assert!(poly.a > 0.0);
        assert_abs_diff_eq!(poly.a * day * day, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
        // Day 40: 0.5·1600 − 120 + 7.
        assert_abs_diff_eq!(fit.predict(1.7e9 + 40.0 * day), 687.0, epsilon = 1e-3);
    }

    #[test]
    fn polynomial_fit_with_two_points_degrades_to_a_line() {
        let fit = TrendAnalyzer::fit(&[0.0, 1.0], &[1.0, 3.0], TrendKind::Polynomial).unwrap();
        let poly = fit.polynomial.unwrap();
        assert_eq!(poly.a, 0.0);
        assert_abs_diff_eq!(poly.b, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(poly.c, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_short_or_mismatched_input() {
        assert_eq!(
            TrendAnalyzer::fit(&[1.0], &[1.0], TrendKind::Linear),
            Err(TrendError::InsufficientData {
                required: 2,
                actual: 1
            })
        );
        assert!(matches!(
            TrendAnalyzer::fit(&[1.0, 2.0], &[1.0], TrendKind::Linear),
            Err(TrendError::InvalidParameters(_))
        ));
    }

    #[test]
    fn fit_series_uses_ordinal_positions() {
        let points = core_types::from_values(&[3.0, 5.0, 7.0]);
        let fit = TrendAnalyzer::fit_series(&points, TrendKind::Linear).unwrap();
        assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.intercept, 3.0, epsilon = 1e-12);
    }
}
