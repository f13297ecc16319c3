use crate::error::AnalyticsError;
use crate::report::{ComparisonReport, SeriesReport};
use anomaly::{AnomalyDetector, AnomalyMethod, AnomalyResult};
use configuration::AnalysisConfig;
use core_types::limits::{
    MIN_POINTS_ANOMALY, MIN_POINTS_FORECAST, MIN_POINTS_PATTERNS, MIN_POINTS_TREND,
};
use core_types::{TimeSeriesPoint, TrendKind};
use decomposition::Decomposer;
use forecasting::{ForecastMethod, Forecaster};
use patterns::{PatternDetector, SeasonalityInfo};
use trend::TrendAnalyzer;
use tracing::{debug, info};

/// Runs every analysis that a series has enough data for.
#[derive(Debug)]
pub struct AnalyticsEngine {
    config: AnalysisConfig,
    decomposer: Decomposer,
    forecaster: Forecaster,
    detector: AnomalyDetector,
    patterns: PatternDetector,
}

impl AnalyticsEngine {
    /// Validates `config` and builds one instance of each component from it.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self {
            decomposer: Decomposer::new(config.seasonality.clone())?,
            forecaster: Forecaster::new(config.forecast.clone(), config.seasonality.clone())?,
            detector: AnomalyDetector::new(config.anomaly.clone())?,
            patterns: PatternDetector::new(
                config.seasonality.clone(),
                config.step_changes.clone(),
            )?,
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn decomposer(&self) -> &Decomposer {
        &self.decomposer
    }

    pub fn forecaster(&self) -> &Forecaster {
        &self.forecaster
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    pub fn patterns(&self) -> &PatternDetector {
        &self.patterns
    }

    /// The main entry point: analyzes `points` and forecasts `horizon` steps ahead.
    ///
    /// A `horizon` of 0 skips the forecast.
    ///
    /// # Errors
    ///
    /// `EmptySeries` for an empty input. Every other shortfall only skips sections.
    pub fn analyze(
        &self,
        points: &[TimeSeriesPoint],
        horizon: usize,
    ) -> Result<SeriesReport, AnalyticsError> {
        if points.is_empty() {
            return Err(AnalyticsError::EmptySeries);
        }

        let n = points.len();
        info!(points = n, horizon, "Analyzing series");

        let values = core_types::values(points);
        let mut report = SeriesReport {
            points: n,
            summary: statistics::summary(&values)?,
            trend: None,
            decomposition: None,
            seasonality: None,
            forecast: None,
            anomalies: None,
            cycles: None,
            step_changes: None,
            skipped: Vec::new(),
        };

        if n >= MIN_POINTS_TREND {
            let fit = TrendAnalyzer::fit_series(points, TrendKind::Linear)?;
            debug!(slope = fit.slope, r_squared = fit.r_squared, "Fitted linear trend");
            report.trend = Some(fit);
        } else {
            report.skip("trend", MIN_POINTS_TREND, n);
        }

        let min_seasonal = self.config.seasonality.min_points;
        if n >= min_seasonal {
            let decomposition = self.decomposer.decompose(&values)?;
            let seasonality = self.patterns.seasonality_of(&decomposition);
            debug!(
                period = decomposition.period,
                is_seasonal = seasonality.is_seasonal,
                strength = seasonality.strength,
                "Decomposed series"
            );
            report.decomposition = Some(decomposition);
            report.seasonality = Some(seasonality);
        } else {
            report.skip("decomposition", min_seasonal, n);
            report.skip("seasonality", min_seasonal, n);
        }

        if horizon == 0 {
            report
                .skipped
                .push("forecast: no horizon requested".to_string());
        } else if n >= MIN_POINTS_FORECAST {
            let method = forecast_method_for(report.seasonality.as_ref());
            debug!(%method, horizon, "Forecasting");
            report.forecast = Some(self.forecaster.forecast(points, horizon, method)?);
        } else {
            report.skip("forecast", MIN_POINTS_FORECAST, n);
        }

        if n >= MIN_POINTS_ANOMALY {
            let anomalies = self.detector.detect_default(points)?;
            debug!(
                method = %anomalies.method,
                flagged = anomalies.anomaly_count(),
                "Detected anomalies"
            );
            report.anomalies = Some(anomalies);
        } else {
            report.skip("anomalies", MIN_POINTS_ANOMALY, n);
        }

        if n >= MIN_POINTS_PATTERNS {
            report.cycles = Some(self.patterns.detect_cycles(&values)?);
            report.step_changes = Some(self.patterns.detect_step_changes(&values)?);
        } else {
            report.skip("cycles", MIN_POINTS_PATTERNS, n);
            report.skip("step changes", MIN_POINTS_PATTERNS, n);
        }

        if !report.skipped.is_empty() {
            info!(skipped = report.skipped.len(), "Some sections were skipped");
        }
        Ok(report)
    }

    /// Runs `method` on the decomposition residual instead of the raw values.
    ///
    /// Trend and seasonality are removed first, so only surprises relative to the
    /// expected pattern are flagged. The records keep the original timestamps, and
    /// their values are residuals.
    pub fn detect_residual_anomalies(
        &self,
        points: &[TimeSeriesPoint],
        method: AnomalyMethod,
    ) -> Result<AnomalyResult, AnalyticsError> {
        let decomposition = self.decomposer.decompose_series(points)?;
        let residual_points: Vec<TimeSeriesPoint> = points
            .iter()
            .zip(&decomposition.residual)
            .map(|(p, r)| TimeSeriesPoint::new(p.timestamp(), *r))
            .collect();
        debug!(period = decomposition.period, %method, "Detecting residual anomalies");
        Ok(self.detector.detect(&residual_points, method)?)
    }

    /// Compares two series position by position.
    pub fn compare(
        &self,
        a: &[TimeSeriesPoint],
        b: &[TimeSeriesPoint],
    ) -> Result<ComparisonReport, AnalyticsError> {
        let values_a = core_types::values(a);
        let values_b = core_types::values(b);
        let correlation = self.patterns.correlation(&values_a, &values_b)?;
        info!(
            points = a.len(),
            coefficient = correlation.correlation_coefficient,
            "Compared series"
        );
        Ok(ComparisonReport {
            points: a.len(),
            summary_a: statistics::summary(&values_a)?,
            summary_b: statistics::summary(&values_b)?,
            correlation,
        })
    }
}

/// Seasonal when a qualifying period was found and the series is seasonal enough,
/// otherwise a straight line.
fn forecast_method_for(seasonality: Option<&SeasonalityInfo>) -> ForecastMethod {
    match seasonality {
        Some(info) if info.is_seasonal && info.period.is_some() => ForecastMethod::Seasonal,
        _ => ForecastMethod::LinearRegression,
    }
}

impl SeriesReport {
    fn skip(&mut self, section: &str, required: usize, actual: usize) {
        self.skipped.push(format!(
            "{}: needs at least {} points, got {}",
            section, required, actual
        ));
    }
}
