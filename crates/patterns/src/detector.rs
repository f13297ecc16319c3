use crate::error::PatternError;
use crate::result::{CorrelationResult, CycleInfo, SeasonalityInfo, StepChange};
use configuration::{SeasonalityParams, StepChangeParams};
use core_types::limits::MIN_POINTS_PATTERNS;
use core_types::{CorrelationDirection, Strength, TrendDirection};
use decomposition::{Decomposer, DecompositionResult};
use statistics::{covariance, variance};


#[derive(Debug, Clone)]
pub struct PatternDetector {
    decomposer: Decomposer,
    steps: StepChangeParams,
}

impl PatternDetector {
    pub fn new(
        seasonality: SeasonalityParams,
        steps: StepChangeParams,
    ) -> Result<Self, PatternError> {
        steps
            .validate()
            .map_err(|e| PatternError::InvalidParameters(e.to_string()))?;
        let decomposer = Decomposer::new(seasonality)?;
        Ok(Self { decomposer, steps })
    }

    pub fn seasonality_params(&self) -> &SeasonalityParams {
        self.decomposer.params()
    }

    pub fn step_change_params(&self) -> &StepChangeParams {
        &self.steps
    }

    /// Decomposes `values` and judges how seasonal they are.
    ///
    /// # Errors
    ///
    /// `InsufficientData` below the configured `min_points`.
    pub fn detect_seasonality(&self, values: &[f64]) -> Result<SeasonalityInfo, PatternError> {
        let required = self.seasonality_params().min_points;
        if values.len() < required {
            return Err(PatternError::InsufficientData {
                pattern: "seasonality",
                required,
                actual: values.len(),
            });
        }
        let decomposition = self.decomposer.decompose(values)?;
        Ok(self.seasonality_of(&decomposition))
    }

    /// Seasonality of an existing decomposition, for callers that already hold one.
    pub fn seasonality_of(&self, decomposition: &DecompositionResult) -> SeasonalityInfo {
        let params = self.seasonality_params();
        let seasonal = &decomposition.seasonal;
        let seasonal_mean = if seasonal.is_empty() {
            0.0
        } else {
            seasonal.iter().sum::<f64>() / seasonal.len() as f64
        };
        let seasonal_variance = variance(seasonal, seasonal_mean);

        let best = self
            .decomposer
            .best_candidate_period(&decomposition.detrended());

        SeasonalityInfo {
            is_seasonal: seasonal_variance > params.strength_threshold,
            period: best.map(|(p, _)| p),
            strength: best.map_or(0.0, |(_, ac)| ac),
            variance: seasonal_variance,
        }
    }

    /// Finds strict local maxima and minima.
    pub fn detect_cycles(&self, values: &[f64]) -> Result<CycleInfo, PatternError> {
        if values.len() < MIN_POINTS_PATTERNS {
            return Err(PatternError::InsufficientData {
                pattern: "cycles",
                required: MIN_POINTS_PATTERNS,
                actual: values.len(),
            });
        }

        let mut peaks = Vec::new();
        let mut troughs = Vec::new();
        for (i, w) in values.windows(3).enumerate() {
            if w[1] > w[0] && w[1] > w[2] {
                peaks.push(i + 1);
            } else if w[1] < w[0] && w[1] < w[2] {
                troughs.push(i + 1);
            }
        }

        let average_cycle_length = if peaks.len() >= 2 {
            let gaps: usize = peaks.windows(2).map(|p| p[1] - p[0]).sum();
            Some(gaps as f64 / (peaks.len() - 1) as f64)
        } else {
            None
        };

        Ok(CycleInfo {
            peaks,
            troughs,
            average_cycle_length,
        })
    }

    /// Flags jumps between consecutive observations that exceed `threshold` standard
    /// deviations of the trailing window.
    ///
    /// The window ends at the observation before the jump. Scanning starts once it
    /// holds at least half of `window` points (and never fewer than two), so the first
    /// few points of a noisy series are not compared against a degenerate spread.
    pub fn detect_step_changes(&self, values: &[f64]) -> Result<Vec<StepChange>, PatternError> {
        if values.len() < MIN_POINTS_PATTERNS {
            return Err(PatternError::InsufficientData {
                pattern: "step changes",
                required: MIN_POINTS_PATTERNS,
                actual: values.len(),
            });
        }

        let window = self.steps.window;
        let min_window = (window / 2).max(2);
        let mut changes = Vec::new();

        for i in min_window..values.len() {
            let trailing = &values[i.saturating_sub(window)..i];
            let local_mean = trailing.iter().sum::<f64>() / trailing.len() as f64;
            let local_std_dev = variance(trailing, local_mean).sqrt();

            let previous_value = values[i - 1];
            let value = values[i];
            let change = value - previous_value;
            if change == 0.0 || change.abs() <= self.steps.threshold * local_std_dev {
                continue;
            }

            let percent_change = if previous_value != 0.0 {
                Some(change / previous_value.abs() * 100.0)
            } else {
                None
            };
            changes.push(StepChange {
                index: i,
                previous_value,
                value,
                change,
                percent_change,
                local_std_dev,
                direction: TrendDirection::from_slope(change),
            });
        }
        Ok(changes)
    }

    /// Pearson correlation between two equally long series.
    ///
    /// A series with zero variance correlates with nothing: the coefficient is 0.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` for mismatched lengths or fewer than two points.
    pub fn correlation(&self, a: &[f64], b: &[f64]) -> Result<CorrelationResult, PatternError> {
        if a.len() != b.len() {
            return Err(PatternError::InvalidParameters(format!(
                "series must have the same length to correlate, got {} and {}",
                a.len(),
                b.len()
            )));
        }
        if a.len() < 2 {
            return Err(PatternError::InvalidParameters(format!(
                "correlation needs at least 2 points per series, got {}",
                a.len()
            )));
        }

        let covariance = covariance(a, b)?;
        let n = a.len() as f64;
        let std_a = variance(a, a.iter().sum::<f64>() / n).sqrt();
        let std_b = variance(b, b.iter().sum::<f64>() / n).sqrt();

        let coefficient = if std_a == 0.0 || std_b == 0.0 {
            0.0
        } else {
            (covariance / (std_a * std_b)).clamp(-1.0, 1.0)
        };

        Ok(CorrelationResult {
            correlation_coefficient: coefficient,
            covariance,
            strength: Strength::from_score(coefficient.abs()),
            direction: CorrelationDirection::from_coefficient(coefficient),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn detector() -> PatternDetector {
        PatternDetector::new(SeasonalityParams::default(), StepChangeParams::default()).unwrap()
    }

    fn daily_with_weekly_cycle(days: usize) -> Vec<f64> {
        (0..days)
            .map(|d| {
                let d = d as f64;
                100.0 + 0.5 * d + 5.0 * (2.0 * PI * d / 7.0).sin()
            })
            .collect()
    }

    #[test]
    fn finds_weekly_seasonality() {
        let info = detector()
            .detect_seasonality(&daily_with_weekly_cycle(90))
            .unwrap();
        assert!(info.is_seasonal);
        assert_eq!(info.period, Some(7));
        assert!(info.strength > 0.5, "strength {}", info.strength);
        assert!(info.variance > 1.0);
    }

    #[test]
    fn straight_line_is_not_seasonal() {
        let line: Vec<f64> = (0..40).map(|x| 2.0 * x as f64).collect();
        let info = detector().detect_seasonality(&line).unwrap();
        assert!(!info.is_seasonal);
        assert!(info.variance < 0.3);
    }

    #[test]
    fn seasonality_needs_min_points() {
        let err = detector().detect_seasonality(&[1.0; 13]).unwrap_err();
        assert_eq!(
            err,
            PatternError::InsufficientData {
                pattern: "seasonality",
                required: 14,
                actual: 13
            }
        );
    }

    #[test]
    fn no_period_when_series_too_short_for_two_cycles() {
        // 14 points cover two weekly cycles but not two monthly ones.
        let values = daily_with_weekly_cycle(14);
        let info = detector().detect_seasonality(&values).unwrap();
        assert_ne!(info.period, Some(30));

        let params = SeasonalityParams {
            candidate_periods: vec![30],
            default_period: 30,
            ..SeasonalityParams::default()
        };
        let monthly_only = PatternDetector::new(params, StepChangeParams::default()).unwrap();
        let info = monthly_only.detect_seasonality(&values).unwrap();
        assert_eq!(info.period, None);
        assert_eq!(info.strength, 0.0);
    }

    #[test]
    fn seasonal_period_agrees_with_the_decomposition() {
        let values = daily_with_weekly_cycle(90);
        let decomposition = Decomposer::new(SeasonalityParams::default())
            .unwrap()
            .decompose(&values)
            .unwrap();
        let info = detector().seasonality_of(&decomposition);
        assert_eq!(info.period, Some(decomposition.period));
        assert_abs_diff_eq!(info.strength, decomposition.autocorrelation, epsilon = 1e-12);

        // The decomposer falls back to its default period; the detector reports none.
        let short = Decomposer::new(SeasonalityParams::default())
            .unwrap()
            .decompose(&values[..10])
            .unwrap();
        assert_eq!(short.period, 7);
        assert_eq!(detector().seasonality_of(&short).period, None);
    }

    #[test]
    fn cycles_and_steps_share_the_minimum_length() {
        for err in [
            detector().detect_cycles(&[1.0, 2.0]).unwrap_err(),
            detector().detect_step_changes(&[1.0, 2.0]).unwrap_err(),
        ] {
            assert!(matches!(
                err,
                PatternError::InsufficientData { required: MIN_POINTS_PATTERNS, actual: 2, .. }
            ));
        }
    }

    #[test]
    fn cycles_mark_strict_extrema() {
        let values = [1.0, 3.0, 1.0, 3.0, 1.0, 3.0, 3.0, 1.0];
        let cycles = detector().detect_cycles(&values).unwrap();
        // The plateau at 5..=6 is not a strict peak.
        assert_eq!(cycles.peaks, vec![1, 3]);
        assert_eq!(cycles.troughs, vec![2, 4]);
        assert_eq!(cycles.average_cycle_length, Some(2.0));
    }

    #[test]
    fn cycle_length_needs_two_peaks() {
        let cycles = detector().detect_cycles(&[1.0, 2.0, 3.0, 2.0]).unwrap();
        assert_eq!(cycles.peaks, vec![2]);
        assert!(cycles.troughs.is_empty());
        assert_eq!(cycles.average_cycle_length, None);
        assert!(detector().detect_cycles(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn detects_a_level_shift() {
        let values = [
            10.0, 10.5, 10.0, 9.5, 10.0, 10.5, 10.0, 9.5, 10.0, 10.5, 50.0, 50.5, 50.0, 49.5,
            50.0,
        ];
        let changes = detector().detect_step_changes(&values).unwrap();
        assert_eq!(changes.len(), 1);
        let step = &changes[0];
        assert_eq!(step.index, 10);
        assert_eq!(step.previous_value, 10.5);
        assert_eq!(step.value, 50.0);
        assert_abs_diff_eq!(step.change, 39.5, epsilon = 1e-12);
        assert_abs_diff_eq!(step.percent_change.unwrap(), 39.5 / 10.5 * 100.0, epsilon = 1e-9);
        assert_eq!(step.direction, TrendDirection::Increasing);
    }

    #[test]
    fn drop_is_decreasing_and_flat_series_has_no_steps() {
        let mut values = vec![20.0; 8];
        values.extend([5.0; 4]);
        let changes = detector().detect_step_changes(&values).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].index, 8);
        assert_eq!(changes[0].direction, TrendDirection::Decreasing);
        assert_eq!(changes[0].local_std_dev, 0.0);

        assert!(detector().detect_step_changes(&[3.0; 12]).unwrap().is_empty());
    }

    #[test]
    fn step_from_zero_has_no_percentage() {
        let mut values = vec![0.0; 6];
        values.push(4.0);
        let changes = detector().detect_step_changes(&values).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].percent_change, None);
    }

    #[test]
    fn perfect_correlations() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up = [2.0, 4.0, 6.0, 8.0, 10.0];
        let down = [10.0, 8.0, 6.0, 4.0, 2.0];

        let r = detector().correlation(&a, &up).unwrap();
        assert_abs_diff_eq!(r.correlation_coefficient, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.covariance, 4.0, epsilon = 1e-12);
        assert_eq!(r.strength, Strength::VeryStrong);
        assert_eq!(r.direction, CorrelationDirection::Positive);

        let r = detector().correlation(&a, &down).unwrap();
        assert_abs_diff_eq!(r.correlation_coefficient, -1.0, epsilon = 1e-12);
        assert_eq!(r.direction, CorrelationDirection::Negative);
    }

    #[test]
    fn constant_series_correlates_with_nothing() {
        let r = detector()
            .correlation(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0])
            .unwrap();
        assert_eq!(r.correlation_coefficient, 0.0);
        assert_eq!(r.direction, CorrelationDirection::None);
        assert_eq!(r.strength, Strength::VeryWeak);
    }

    #[test]
    fn correlation_rejects_bad_input() {
        assert!(matches!(
            detector().correlation(&[1.0, 2.0], &[1.0]),
            Err(PatternError::InvalidParameters(_))
        ));
        assert!(matches!(
            detector().correlation(&[1.0], &[1.0]),
            Err(PatternError::InvalidParameters(_))
        ));
    }

    #[test]
    fn autocorrelation_of_alternating_series() {
        let values = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        assert!(crate::autocorrelation(&values, 1) < -0.5);
        assert!(crate::autocorrelation(&values, 2) > 0.5);
        assert_eq!(crate::autocorrelation(&values, 6), 0.0);
    }
}
