use crate::error::ForecastError;
use crate::result::{ConfidenceInterval, ForecastResult};
use configuration::{ForecastParams, SeasonalityParams};
use core_types::limits::MIN_POINTS_FORECAST;
use core_types::{ForecastMethod, TimeSeriesPoint, TrendKind};
use decomposition::Decomposer;
use std::collections::BTreeMap;
use trend::TrendAnalyzer;

const MOVING_AVERAGE_BAND: f64 = 0.10;
const SMOOTHING_BAND: f64 = 0.15;
const WEIGHTED_BAND_LOWER: f64 = 0.12;
const WEIGHTED_BAND_UPPER: f64 = 0.08;

/// Produces forecasts with one of the supported models.
#[derive(Debug, Clone)]
pub struct Forecaster {
    params: ForecastParams,
    decomposer: Decomposer,
}

/// The model-specific part of a forecast, before timestamps are attached.
struct Projection {
    forecasts: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    level: Option<f64>,
    parameters: BTreeMap<String, f64>,
}

impl Forecaster {
    /// Creates a new `Forecaster`.
    ///
    /// `seasonality` configures the decomposition behind `ForecastMethod::Seasonal`.
    pub fn new(
        params: ForecastParams,
        seasonality: SeasonalityParams,
    ) -> Result<Self, ForecastError> {
        params
            .validate()
            .map_err(|e| ForecastError::InvalidParameters(e.to_string()))?;
        Ok(Self {
            params,
            decomposer: Decomposer::new(seasonality)?,
        })
    }

    pub fn params(&self) -> &ForecastParams {
        &self.params
    }

    /// Forecasts `periods` steps past the last point with the configured default method.
    pub fn forecast_default(
        &self,
        points: &[TimeSeriesPoint],
        periods: usize,
    ) -> Result<ForecastResult, ForecastError> {
        self.forecast(points, periods, self.params.default_method)
    }

    /// Forecasts `periods` steps past the last point.
    ///
    /// `Seasonal` needs two full cycles of history; below that the forecast is a
    /// `LinearRegression` one, and `ForecastResult::method` says so.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` if `periods` is 0 or the series has fewer than 3 points.
    pub fn forecast(
        &self,
        points: &[TimeSeriesPoint],
        periods: usize,
        method: ForecastMethod,
    ) -> Result<ForecastResult, ForecastError> {
        if periods < 1 {
            return Err(ForecastError::InvalidParameters(
                "periods must be at least 1".to_string(),
            ));
        }
        if points.len() < MIN_POINTS_FORECAST {
            return Err(ForecastError::InvalidParameters(format!(
                "forecasting needs at least {} points, got {}",
                MIN_POINTS_FORECAST,
                points.len()
            )));
        }

        let values = core_types::values(points);
        let (method, projection) = match method {
            ForecastMethod::MovingAverage => (method, self.moving_average(&values, periods)),
            ForecastMethod::ExponentialSmoothing => {
                (method, self.exponential_smoothing(&values, periods))
            }
            ForecastMethod::WeightedAverage => (method, self.weighted_average(&values, periods)),
            ForecastMethod::LinearRegression => (method, self.linear_regression(&values, periods)?),
            ForecastMethod::Seasonal => match self.seasonal(&values, periods)? {
                Some(projection) => (method, projection),
                None => (
                    ForecastMethod::LinearRegression,
                    self.linear_regression(&values, periods)?,
                ),
            },
        };

        let step = core_types::step(points);
        let last = points[points.len() - 1].timestamp();
        let timestamps = (1..=periods as i64).map(|h| last + step * h).collect();

        Ok(ForecastResult {
            method,
            periods,
            timestamps,
            forecasts: projection.forecasts,
            confidence_interval: ConfidenceInterval {
                lower: projection.lower,
                upper: projection.upper,
                level: projection.level,
            },
            parameters: projection.parameters,
        })
    }

    fn moving_average(&self, values: &[f64], periods: usize) -> Projection {
        let window = self.params.moving_average_window.min(values.len());
        let tail = &values[values.len() - window..];
        let average = tail.iter().sum::<f64>() / window as f64;

        let mut parameters = BTreeMap::new();
        parameters.insert("window".to_string(), window as f64);
        flat_projection(
            average,
            periods,
            MOVING_AVERAGE_BAND,
            MOVING_AVERAGE_BAND,
            parameters,
        )
    }

    fn exponential_smoothing(&self, values: &[f64], periods: usize) -> Projection {
        let alpha = self.params.smoothing_alpha;
        let level = values[1..]
            .iter()
            .fold(values[0], |smoothed, v| alpha * v + (1.0 - alpha) * smoothed);

        let mut parameters = BTreeMap::new();
        parameters.insert("alpha".to_string(), alpha);
        parameters.insert("smoothed_level".to_string(), level);
        flat_projection(level, periods, SMOOTHING_BAND, SMOOTHING_BAND, parameters)
    }

    fn weighted_average(&self, values: &[f64], periods: usize) -> Projection {
        let window = self.params.weighted_window.min(values.len());
        let tail = &values[values.len() - window..];

        // Weights 1..=window, the most recent observation heaviest.
        let weighted_sum: f64 = tail
            .iter()
            .enumerate()
            .map(|(i, v)| (i + 1) as f64 * v)
            .sum();
        let weight_total = (window * (window + 1) / 2) as f64;
        let average = weighted_sum / weight_total;

        let mut parameters = BTreeMap::new();
        parameters.insert("window".to_string(), window as f64);
        flat_projection(
            average,
            periods,
            WEIGHTED_BAND_LOWER,
            WEIGHTED_BAND_UPPER,
            parameters,
        )
    }

    /// Extrapolates the OLS line through `(i, values[i])`.
    ///
    /// The band is the prediction interval `± z·SE·√(1 + 1/n)` with
    /// `SE = √(SS_res / (n − 2))`.
    fn linear_regression(&self, values: &[f64], periods: usize) -> Result<Projection, ForecastError> {
        let n = values.len();
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let fit = TrendAnalyzer::fit(&x, values, TrendKind::Linear)?;

        let ss_res: f64 = x
            .iter()
            .zip(values)
            .map(|(xi, yi)| (yi - fit.predict(*xi)).powi(2))
            .sum();
        let standard_error = (ss_res / (n - 2) as f64).sqrt();
        let margin = self.z_value() * standard_error * (1.0 + 1.0 / n as f64).sqrt();

        let forecasts: Vec<f64> = (1..=periods)
            .map(|h| fit.predict((n - 1 + h) as f64))
            .collect();
        let lower = forecasts.iter().map(|f| f - margin).collect();
        let upper = forecasts.iter().map(|f| f + margin).collect();

        let mut parameters = BTreeMap::new();
        parameters.insert("slope".to_string(), fit.slope);
        parameters.insert("intercept".to_string(), fit.intercept);
        parameters.insert("r_squared".to_string(), fit.r_squared);
        parameters.insert("standard_error".to_string(), standard_error);

        Ok(Projection {
            forecasts,
            lower,
            upper,
            level: Some(self.params.confidence_level),
            parameters,
        })
    }

    /// Extrapolates the decomposition trend linearly and adds the seasonal cycle.
    ///
    /// Forecasts are floored at 0 (demand cannot be negative), and so is the lower bound.
    /// Returns `None` when the series covers fewer than two full cycles, since some cycle
    /// positions would then rest on one observation or none.
    fn seasonal(
        &self,
        values: &[f64],
        periods: usize,
    ) -> Result<Option<Projection>, ForecastError> {
        let n = values.len();
        let decomposition = self.decomposer.decompose(values)?;
        let period = decomposition.period;
        if n < 2 * period {
            return Ok(None);
        }

        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let trend_fit = TrendAnalyzer::fit(&x, &decomposition.trend, TrendKind::Linear)?;
        let residual_std_dev = statistics::std_dev(&decomposition.residual)?;
        let margin = self.z_value() * residual_std_dev * (1.0 + 1.0 / n as f64).sqrt();

        let forecasts: Vec<f64> = (1..=periods)
            .map(|i| {
                let trend = trend_fit.predict((n - 1 + i) as f64);
                let seasonal = decomposition.seasonal_cycle[(n + i - 1) % period];
                (trend + seasonal).max(0.0)
            })
            .collect();
        let lower = forecasts.iter().map(|f| (f - margin).max(0.0)).collect();
        let upper = forecasts.iter().map(|f| f + margin).collect();

        let mut parameters = BTreeMap::new();
        parameters.insert("period".to_string(), period as f64);
        parameters.insert("trend_slope".to_string(), trend_fit.slope);
        parameters.insert("trend_intercept".to_string(), trend_fit.intercept);
        parameters.insert("seasonal_autocorrelation".to_string(), decomposition.autocorrelation);
        parameters.insert("residual_std_dev".to_string(), residual_std_dev);

        Ok(Some(Projection {
            forecasts,
            lower,
            upper,
            level: Some(self.params.confidence_level),
            parameters,
        }))
    }

    fn z_value(&self) -> f64 {
        // `new` validated the confidence level, so it lies in (0, 1).
        self.params.z_value().unwrap_or(1.96)
    }
}

/// A constant forecast with a percentage band around it.
///
/// The band scales with `|value|` so that it stays ordered for negative forecasts.
fn flat_projection(
    value: f64,
    periods: usize,
    below: f64,
    above: f64,
    parameters: BTreeMap<String, f64>,
) -> Projection {
    let magnitude = value.abs();
    Projection {
        forecasts: vec![value; periods],
        lower: vec![value - magnitude * below; periods],
        upper: vec![value + magnitude * above; periods],
        level: None,
        parameters,
    }
}
