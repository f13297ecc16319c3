use crate::error::AnomalyError;
use crate::result::{AnomalyRecord, AnomalyResult, DeviationMetric, ExpectedRange};
use configuration::AnomalyParams;
use core_types::limits::MIN_POINTS_ANOMALY;
use core_types::{AnomalyMethod, Severity, TimeSeriesPoint};
use std::collections::BTreeMap;

/// Scale factor that makes the MAD a consistent estimator of σ for normal data.
const MAD_SCALE: f64 = 0.6745;

/// Points beyond this multiple of a method's threshold are `High` severity.
const HIGH_SEVERITY_FACTOR: f64 = 1.5;

/// Flags outliers in a series. Holds only its thresholds.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    params: AnomalyParams,
}

impl AnomalyDetector {
    /// Creates a new `AnomalyDetector` with one sensitivity profile.
    pub fn new(params: AnomalyParams) -> Result<Self, AnomalyError> {
        params
            .validate()
            .map_err(|e| AnomalyError::InvalidParameters(e.to_string()))?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AnomalyParams {
        &self.params
    }

    /// Runs the configured default method.
    pub fn detect_default(&self, points: &[TimeSeriesPoint]) -> Result<AnomalyResult, AnomalyError> {
        self.detect(points, self.params.default_method)
    }

    /// Runs `method` over `points`.
    ///
    /// # Errors
    ///
    /// `InsufficientData` for fewer than 5 points.
    pub fn detect(
        &self,
        points: &[TimeSeriesPoint],
        method: AnomalyMethod,
    ) -> Result<AnomalyResult, AnomalyError> {
        if points.len() < MIN_POINTS_ANOMALY {
            return Err(AnomalyError::InsufficientData {
                required: MIN_POINTS_ANOMALY,
                actual: points.len(),
            });
        }

        let values = core_types::values(points);
        let mut result = AnomalyResult {
            method,
            total_points: points.len(),
            anomalies: Vec::new(),
            parameters: BTreeMap::new(),
            note: None,
        };

        match method {
            AnomalyMethod::Statistical => self.statistical(points, &values, &mut result)?,
            AnomalyMethod::Iqr => self.iqr(points, &values, &mut result)?,
            AnomalyMethod::ZScore => self.z_score(points, &values, &mut result)?,
            AnomalyMethod::Mad => self.mad(points, &values, &mut result)?,
        }

        Ok(result)
    }

    /// Flags `|v − mean| > sensitivity · σ`.
    fn statistical(
        &self,
        points: &[TimeSeriesPoint],
        values: &[f64],
        result: &mut AnomalyResult,
    ) -> Result<(), AnomalyError> {
        let mean = statistics::mean(values)?;
        let std_dev = statistics::variance(values, mean).sqrt();
        let threshold = self.params.sensitivity * std_dev;

        result.parameters.insert("sensitivity".to_string(), self.params.sensitivity);
        result.parameters.insert("mean".to_string(), mean);
        result.parameters.insert("std_dev".to_string(), std_dev);
        result.parameters.insert("threshold".to_string(), threshold);

        if std_dev == 0.0 {
            result.note = Some(zero_spread_note("standard deviation"));
            return Ok(());
        }

        let expected = ExpectedRange {
            lower: mean - threshold,
            upper: mean + threshold,
        };
        for (index, point) in points.iter().enumerate() {
            let deviation = point.value() - mean;
            if deviation.abs() > threshold {
                let severity = if deviation.abs() > HIGH_SEVERITY_FACTOR * threshold {
                    Severity::High
                } else {
                    Severity::Medium
                };
                result.anomalies.push(record(
                    index,
                    point,
                    DeviationMetric::Deviation(deviation),
                    severity,
                    expected,
                ));
            }
        }
        Ok(())
    }

    /// Flags values outside `[Q1 − m·IQR, Q3 + m·IQR]`; beyond a further IQR is `High`.
    fn iqr(
        &self,
        points: &[TimeSeriesPoint],
        values: &[f64],
        result: &mut AnomalyResult,
    ) -> Result<(), AnomalyError> {
        let q = statistics::quartiles(values)?;
        let multiplier = self.params.iqr_multiplier;
        let lower = q.q1 - multiplier * q.iqr;
        let upper = q.q3 + multiplier * q.iqr;

        result.parameters.insert("multiplier".to_string(), multiplier);
        result.parameters.insert("q1".to_string(), q.q1);
        result.parameters.insert("q3".to_string(), q.q3);
        result.parameters.insert("iqr".to_string(), q.iqr);
        result.parameters.insert("lower_bound".to_string(), lower);
        result.parameters.insert("upper_bound".to_string(), upper);

        let expected = ExpectedRange { lower, upper };
        for (index, point) in points.iter().enumerate() {
            let v = point.value();
            let past_fence = if v < lower {
                v - lower
            } else if v > upper {
                v - upper
            } else {
                continue;
            };

            let severity = if past_fence.abs() > q.iqr {
                Severity::High
            } else {
                Severity::Medium
            };
            result.anomalies.push(record(
                index,
                point,
                DeviationMetric::Deviation(past_fence),
                severity,
                expected,
            ));
        }
        Ok(())
    }

    /// Flags `|z| > threshold`.
    ///
    /// With `z_score_leave_one_out` each point is scored against the mean and σ of the
    /// other points, so a single large outlier cannot mask itself by inflating σ (an
    /// in-sample |z| can never exceed √(n − 1)). When the other points have no spread
    /// the whole-series statistics are used instead.
    fn z_score(
        &self,
        points: &[TimeSeriesPoint],
        values: &[f64],
        result: &mut AnomalyResult,
    ) -> Result<(), AnomalyError> {
        let n = values.len() as f64;
        let mean = statistics::mean(values)?;
        let total_ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        let std_dev = (total_ss / n).sqrt();
        let threshold = self.params.z_score_threshold;
        let leave_one_out = self.params.z_score_leave_one_out;

        result.parameters.insert("threshold".to_string(), threshold);
        result.parameters.insert("mean".to_string(), mean);
        result.parameters.insert("std_dev".to_string(), std_dev);
        result.parameters.insert(
            "leave_one_out".to_string(),
            if leave_one_out { 1.0 } else { 0.0 },
        );

        if std_dev == 0.0 {
            result.note = Some(zero_spread_note("standard deviation"));
            return Ok(());
        }

        for (index, point) in points.iter().enumerate() {
            let v = point.value();
            let (ref_mean, ref_std) = if leave_one_out {
                // Removing v from the sample: SS' = SS − n/(n−1)·(v − mean)².
                let others_ss = total_ss - n / (n - 1.0) * (v - mean).powi(2);
                if others_ss > total_ss * 1e-12 {
                    ((n * mean - v) / (n - 1.0), (others_ss / (n - 1.0)).sqrt())
                } else {
                    (mean, std_dev)
                }
            } else {
                (mean, std_dev)
            };

            let z = (v - ref_mean) / ref_std;
            if z.abs() > threshold {
                let severity = if z.abs() > HIGH_SEVERITY_FACTOR * threshold {
                    Severity::High
                } else {
                    Severity::Medium
                };
                result.anomalies.push(record(
                    index,
                    point,
                    DeviationMetric::ZScore(z),
                    severity,
                    ExpectedRange {
                        lower: ref_mean - threshold * ref_std,
                        upper: ref_mean + threshold * ref_std,
                    },
                ));
            }
        }
        Ok(())
    }

    /// Flags `|0.6745 · (v − median) / MAD| > threshold`.
    fn mad(
        &self,
        points: &[TimeSeriesPoint],
        values: &[f64],
        result: &mut AnomalyResult,
    ) -> Result<(), AnomalyError> {
        let median = statistics::median(values)?;
        let absolute_deviations: Vec<f64> = values.iter().map(|v| (v - median).abs()).collect();
        let mad = statistics::median(&absolute_deviations)?;
        let threshold = self.params.mad_threshold;

        result.parameters.insert("threshold".to_string(), threshold);
        result.parameters.insert("median".to_string(), median);
        result.parameters.insert("mad".to_string(), mad);

        if mad == 0.0 {
            result.note = Some(zero_spread_note("median absolute deviation"));
            return Ok(());
        }

        let half_width = threshold * mad / MAD_SCALE;
        let expected = ExpectedRange {
            lower: median - half_width,
            upper: median + half_width,
        };
        for (index, point) in points.iter().enumerate() {
            let modified_z = MAD_SCALE * (point.value() - median) / mad;
            if modified_z.abs() > threshold {
                let severity = if modified_z.abs() > HIGH_SEVERITY_FACTOR * threshold {
                    Severity::High
                } else {
                    Severity::Medium
                };
                result.anomalies.push(record(
                    index,
                    point,
                    DeviationMetric::ModifiedZScore(modified_z),
                    severity,
                    expected,
                ));
            }
        }
        Ok(())
    }
}

fn record(
    index: usize,
    point: &TimeSeriesPoint,
    metric: DeviationMetric,
    severity: Severity,
    expected: ExpectedRange,
) -> AnomalyRecord {
    AnomalyRecord {
        index,
        timestamp: point.timestamp(),
        value: point.value(),
        metric,
        severity,
        expected_range: Some(expected),
    }
}

fn zero_spread_note(measure: &str) -> String {
    format!(
        "series has zero {}; no point can deviate, detection skipped",
        measure
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn detector() -> AnomalyDetector {
        AnomalyDetector::new(AnomalyParams::default()).unwrap()
    }

    fn series(values: &[f64]) -> Vec<TimeSeriesPoint> {
        core_types::from_values(values)
    }

    #[test]
    fn z_score_flags_the_spike() {
        let points = series(&[10.0, 12.0, 11.0, 13.0, 12.0, 95.0, 11.0, 10.0]);
        let result = detector().detect(&points, AnomalyMethod::ZScore).unwrap();

        assert_eq!(result.indices(), vec![5]);
        let spike = &result.anomalies[0];
        assert_eq!(spike.value, 95.0);
        assert_eq!(spike.severity, Severity::High);
        assert!(matches!(spike.metric, DeviationMetric::ZScore(z) if z > 3.0));
        assert_eq!(result.note, None);
    }

    #[test]
    fn in_sample_z_score_cannot_reach_threshold_on_short_series() {
        let params = AnomalyParams {
            z_score_leave_one_out: false,
            ..AnomalyParams::default()
        };
        let points = series(&[10.0, 12.0, 11.0, 13.0, 12.0, 95.0, 11.0, 10.0]);
        let result = AnomalyDetector::new(params)
            .unwrap()
            .detect(&points, AnomalyMethod::ZScore)
            .unwrap();
        assert!(result.anomalies.is_empty());
        assert_eq!(result.parameters["leave_one_out"], 0.0);
    }

    #[test]
    fn constant_series_is_safe_for_every_method() {
        let points = series(&[5.0; 6]);
        for method in AnomalyMethod::ALL {
            let result = detector().detect(&points, method).unwrap();
            assert!(result.anomalies.is_empty(), "{} flagged a constant series", method);
        }
        let z = detector().detect(&points, AnomalyMethod::ZScore).unwrap();
        assert!(z.note.is_some());
        let mad = detector().detect(&points, AnomalyMethod::Mad).unwrap();
        assert!(mad.note.is_some());
    }

    #[test]
    fn iqr_fences() {
        let mut values: Vec<f64> = (1..=9).map(|v| v as f64).collect();
        values.push(100.0);
        let result = detector().detect(&series(&values), AnomalyMethod::Iqr).unwrap();
        assert_eq!(result.indices(), vec![9]);
        assert_eq!(result.anomalies[0].severity, Severity::High);
        assert_eq!(result.parameters["upper_bound"], 15.5);
        assert_eq!(result.parameters["lower_bound"], -4.5);

        values.pop();
        let result = detector().detect(&series(&values), AnomalyMethod::Iqr).unwrap();
        assert!(result.anomalies.is_empty());
    }

    #[test]
    fn iqr_medium_severity_just_past_the_fence() {
        // Q1 = 3, Q3 = 8, IQR = 5, upper fence 15.5, high beyond 20.5
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 18.0];
        let result = detector().detect(&series(&values), AnomalyMethod::Iqr).unwrap();
        assert_eq!(result.indices(), vec![9]);
        assert_eq!(result.anomalies[0].severity, Severity::Medium);
        assert_abs_diff_eq!(result.anomalies[0].metric.value(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn statistical_method_thresholds() {
        // mean 4, σ = 6 → threshold 12; the 16 deviates by exactly 12 and is not flagged
        let values = [1.0, 1.0, 1.0, 1.0, 16.0];
        let result = detector().detect(&series(&values), AnomalyMethod::Statistical).unwrap();
        assert_abs_diff_eq!(result.parameters["std_dev"], 6.0, epsilon = 1e-12);
        assert!(result.anomalies.is_empty());

        let tighter = AnomalyDetector::new(AnomalyParams {
            sensitivity: 1.0,
            ..AnomalyParams::default()
        })
        .unwrap();
        let result = tighter.detect(&series(&values), AnomalyMethod::Statistical).unwrap();
        assert_eq!(result.indices(), vec![4]);
        // deviation 12 > 1.5 · 6
        assert_eq!(result.anomalies[0].severity, Severity::High);
        let range = result.anomalies[0].expected_range.unwrap();
        assert_abs_diff_eq!(range.lower, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(range.upper, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn mad_flags_robustly() {
        let values = [10.0, 11.0, 9.0, 10.0, 12.0, 8.0, 10.0, 60.0];
        let result = detector().detect(&series(&values), AnomalyMethod::Mad).unwrap();
        assert_eq!(result.indices(), vec![7]);
        assert!(matches!(result.anomalies[0].metric, DeviationMetric::ModifiedZScore(_)));
        assert_eq!(result.anomalies[0].severity, Severity::High);
        assert_eq!(result.parameters["median"], 10.0);
        assert_eq!(result.parameters["mad"], 1.0);
    }

    #[test]
    fn mad_zero_with_an_outlier_is_reported_as_degenerate() {
        let result = detector()
            .detect(&series(&[10.0, 10.0, 10.0, 10.0, 50.0]), AnomalyMethod::Mad)
            .unwrap();
        assert!(result.anomalies.is_empty());
        assert!(result.note.unwrap().contains("median absolute deviation"));
    }

    #[test]
    fn requires_five_points() {
        assert_eq!(
            detector().detect(&series(&[1.0, 2.0, 3.0, 4.0]), AnomalyMethod::Iqr),
            Err(AnomalyError::InsufficientData {
                required: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn records_carry_timestamps() {
        let points: Vec<TimeSeriesPoint> = [3.0, 3.1, 2.9, 3.0, 3.05, 40.0]
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesPoint::new(1_000 + 60 * i as i64, *v))
            .collect();
        let result = detector().detect(&points, AnomalyMethod::ZScore).unwrap();
        assert_eq!(result.anomalies[0].timestamp, 1_300);
    }

    #[test]
    fn metric_serializes_with_its_kind() {
        let json = serde_json::to_string(&DeviationMetric::ZScore(3.5)).unwrap();
        assert_eq!(json, r#"{"kind":"z_score","value":3.5}"#);
    }

    #[test]
    fn rejects_invalid_thresholds() {
        let params = AnomalyParams {
            z_score_threshold: -1.0,
            ..AnomalyParams::default()
        };
        assert!(matches!(
            AnomalyDetector::new(params),
            Err(AnomalyError::InvalidParameters(_))
        ));
    }
}
