use crate::error::ForecastError;
use crate::forecaster::Forecaster;
use core_types::limits::MIN_POINTS_FORECAST;
use core_types::{ForecastMethod, TimeSeriesPoint};
use serde::{Deserialize, Serialize};

/// How well a model would have predicted the most recent observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    /// The method that produced the forecast; a short `Seasonal` request reports
    /// `LinearRegression`.
    pub method: ForecastMethod,
    /// Number of trailing observations held out and predicted.
    pub holdout: usize,
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute percentage error over the non-zero actuals; `None` if every
    /// held-out actual is zero.
    pub mape: Option<f64>,
}

impl Forecaster {
    /// Backtests `method`: fits on all but the last `holdout` points and scores the
    /// forecast of those points.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` when `holdout` is 0 or leaves fewer than 3 training points.
    pub fn evaluate(
        &self,
        points: &[TimeSeriesPoint],
        holdout: usize,
        method: ForecastMethod,
    ) -> Result<ForecastAccuracy, ForecastError> {
        if holdout == 0 {
            return Err(ForecastError::InvalidParameters(
                "holdout must be at least 1".to_string(),
            ));
        }
        if points.len() < holdout + MIN_POINTS_FORECAST {
            return Err(ForecastError::InvalidParameters(format!(
                "a holdout of {} needs at least {} points, got {}",
                holdout,
                holdout + MIN_POINTS_FORECAST,
                points.len()
            )));
        }

        let split = points.len() - holdout;
        let result = self.forecast(&points[..split], holdout, method)?;

        let errors: Vec<(f64, f64)> = points[split..]
            .iter()
            .zip(&result.forecasts)
            .map(|(actual, predicted)| (actual.value(), actual.value() - predicted))
            .collect();

        let n = errors.len() as f64;
        let mae = errors.iter().map(|(_, e)| e.abs()).sum::<f64>() / n;
        let rmse = (errors.iter().map(|(_, e)| e * e).sum::<f64>() / n).sqrt();

        let percentage_errors: Vec<f64> = errors
            .iter()
            .filter(|(actual, _)| *actual != 0.0)
            .map(|(actual, e)| (e / actual).abs() * 100.0)
            .collect();
        let mape = if percentage_errors.is_empty() {
            None
        } else {
            Some(percentage_errors.iter().sum::<f64>() / percentage_errors.len() as f64)
        };

        Ok(ForecastAccuracy {
            method: result.method,
            holdout,
            mae,
            rmse,
            mape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use configuration::{ForecastParams, SeasonalityParams};

    fn forecaster() -> Forecaster {
        Forecaster::new(ForecastParams::default(), SeasonalityParams::default()).unwrap()
    }

    #[test]
    fn perfect_model_has_zero_error() {
        let points = core_types::from_values(&(0..12).map(|x| 3.0 * x as f64 + 1.0).collect::<Vec<_>>());
        let accuracy = forecaster()
            .evaluate(&points, 4, ForecastMethod::LinearRegression)
            .unwrap();
        assert_abs_diff_eq!(accuracy.mae, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(accuracy.rmse, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(accuracy.mape.unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn scores_a_flat_model_against_a_step() {
        // Trains on [10, 10, 10], predicts 10 for the held-out [12, 8].
        let points = core_types::from_values(&[10.0, 10.0, 10.0, 12.0, 8.0]);
        let accuracy = forecaster()
            .evaluate(&points, 2, ForecastMethod::MovingAverage)
            .unwrap();
        assert_abs_diff_eq!(accuracy.mae, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(accuracy.rmse, 2.0, epsilon = 1e-12);
        // (2/12 + 2/8) / 2 * 100
        assert_abs_diff_eq!(accuracy.mape.unwrap(), (2.0 / 12.0 + 0.25) / 2.0 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn mape_is_undefined_for_zero_actuals() {
        let points = core_types::from_values(&[1.0, 1.0, 1.0, 0.0, 0.0]);
        let accuracy = forecaster()
            .evaluate(&points, 2, ForecastMethod::MovingAverage)
            .unwrap();
        assert_eq!(accuracy.mape, None);
        assert_abs_diff_eq!(accuracy.mae, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_holdouts_that_starve_training() {
        let points = core_types::from_values(&[1.0, 2.0, 3.0, 4.0]);
        assert!(forecaster().evaluate(&points, 0, ForecastMethod::MovingAverage).is_err());
        assert!(forecaster().evaluate(&points, 2, ForecastMethod::MovingAverage).is_err());
        assert!(forecaster().evaluate(&points, 1, ForecastMethod::MovingAverage).is_ok());
    }
}
