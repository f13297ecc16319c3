use crate::error::DecompositionError;
use crate::result::DecompositionResult;
use configuration::SeasonalityParams;
use core_types::TimeSeriesPoint;
use statistics::autocorrelation;

/// Widest moving-average window used for trend extraction.
const MAX_TREND_WINDOW: usize = 7;

/// Splits a series into trend, seasonal and residual components.
///
/// Holds only its (immutable) parameters, so one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct Decomposer {
    params: SeasonalityParams,
}

impl Decomposer {
    /// Creates a new `Decomposer` with the given candidate periods.
    pub fn new(params: SeasonalityParams) -> Result<Self, DecompositionError> {
        params
            .validate()
            .map_err(|e| DecompositionError::InvalidParameters(e.to_string()))?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SeasonalityParams {
        &self.params
    }

    pub fn decompose_series(
        &self,
        points: &[TimeSeriesPoint],
    ) -> Result<DecompositionResult, DecompositionError> {
        self.decompose(&core_types::values(points))
    }

    /// Decomposes `values` additively.
    ///
    /// # Errors
    ///
    /// `InsufficientData` for an empty series.
    pub fn decompose(&self, values: &[f64]) -> Result<DecompositionResult, DecompositionError> {
        let n = values.len();
        if n == 0 {
            return Err(DecompositionError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        // Step 1: Trend extraction
        let window = (n / 3).clamp(1, MAX_TREND_WINDOW);
        let trend = centered_moving_average(values, window);

        // Step 2: Detrending
        let detrended: Vec<f64> = values.iter().zip(&trend).map(|(v, t)| v - t).collect();

        // Step 3: Seasonal extraction
        let (period, strength) = self.select_period(&detrended);
        let seasonal_cycle = centered_cycle(&detrended, period);
        let seasonal: Vec<f64> = (0..n).map(|i| seasonal_cycle[i % period]).collect();

        // Step 4: Residual
        let residual: Vec<f64> = values
            .iter()
            .zip(&trend)
            .zip(&seasonal)
            .map(|((v, t), s)| v - t - s)
            .collect();

        Ok(DecompositionResult {
            original: values.to_vec(),
            trend,
            seasonal,
            residual,
            period,
            seasonal_cycle,
            autocorrelation: strength,
        })
    }

    /// The candidate period with the highest positive autocorrelation of `detrended`.
    ///
    /// A candidate is only considered when the series covers at least two full cycles.
    /// Returns `None` when no candidate qualifies.
    pub fn best_candidate_period(&self, detrended: &[f64]) -> Option<(usize, f64)> {
        let n = detrended.len();
        self.params
            .candidate_periods
            .iter()
            .filter(|&&p| n >= 2 * p)
            .map(|&p| (p, autocorrelation(detrended, p)))
            .filter(|(_, ac)| *ac > 0.0)
            .fold(None::<(usize, f64)>, |best, candidate| match best {
                Some((_, best_ac)) if best_ac >= candidate.1 => best,
                _ => Some(candidate),
            })
    }

    /// The best candidate period, or the configured default period when none qualifies.
    fn select_period(&self, detrended: &[f64]) -> (usize, f64) {
        self.best_candidate_period(detrended).unwrap_or_else(|| {
            let p = self.params.default_period;
            (p, autocorrelation(detrended, p))
        })
    }
}

/// Centred moving average of `window` points.
///
/// Near the ends the window is clamped to the available neighbours, so boundary values
/// average fewer samples rather than being biased toward zero.
pub fn centered_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let before = window.saturating_sub(1) / 2;
    let after = window / 2;

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(before);
            let end = (i + after + 1).min(n);
            values[start..end].iter().sum::<f64>() / (end - start) as f64
        })
        .collect()
}

/// Averages `detrended` by position modulo `period` and subtracts the cycle mean.
///
/// Positions no observation falls on (a series shorter than one period) stay at 0 and
/// are left out of the mean.
fn centered_cycle(detrended: &[f64], period: usize) -> Vec<f64> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, v) in detrended.iter().enumerate() {
        sums[i % period] += v;
        counts[i % period] += 1;
    }

    let covered = counts.iter().filter(|&&c| c > 0).count();
    let averages: Vec<Option<f64>> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| (c > 0).then(|| s / c as f64))
        .collect();
    let cycle_mean = averages.iter().flatten().sum::<f64>() / covered.max(1) as f64;

    averages
        .into_iter()
        .map(|avg| avg.map_or(0.0, |a| a - cycle_mean))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn decomposer() -> Decomposer {
        Decomposer::new(SeasonalityParams::default()).unwrap()
    }

    fn weekly_series(n: usize) -> Vec<f64> {
        (0..n)
            .map(|d| {
                let d = d as f64;
                10.0 + 0.5 * d + 5.0 * (2.0 * PI * d / 7.0).sin()
            })
            .collect()
    }

    #[test]
    fn moving_average_shrinks_at_boundaries() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ma = centered_moving_average(&values, 3);
        assert_eq!(ma, vec![1.5, 2.0, 3.0, 4.0, 4.5]);

        let even = centered_moving_average(&values, 2);
        assert_eq!(even, vec![1.5, 2.5, 3.5, 4.5, 5.0]);
    }

    #[test]
    fn detects_weekly_period() {
        let result = decomposer().decompose(&weekly_series(90)).unwrap();
        assert_eq!(result.period, 7);
        assert!(result.autocorrelation > 0.5, "autocorrelation {}", result.autocorrelation);
        assert_eq!(result.seasonal_cycle.len(), 7);
        for i in 0..result.len() - 7 {
            assert_abs_diff_eq!(result.seasonal[i], result.seasonal[i + 7], epsilon = 1e-12);
        }
    }

    #[test]
    fn seasonal_cycle_sums_to_zero() {
        let result = decomposer().decompose(&weekly_series(60)).unwrap();
        let cycle_sum: f64 = result.seasonal_cycle.iter().sum();
        assert_abs_diff_eq!(cycle_sum, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn prefers_monthly_period_when_it_correlates_better() {
        let values: Vec<f64> = (0..120)
            .map(|d| 50.0 + 8.0 * (2.0 * PI * d as f64 / 30.0).sin())
            .collect();
        let result = decomposer().decompose(&values).unwrap();
        assert_eq!(result.period, 30);
    }

    #[test]
    fn short_series_falls_back_to_default_period() {
        let result = decomposer().decompose(&[3.0, 1.0, 4.0, 1.0, 5.0]).unwrap();
        assert_eq!(result.period, 7);
        assert_eq!(result.trend.len(), 5);
        assert_eq!(result.seasonal.len(), 5);
    }

    #[test]
    fn best_candidate_period_needs_two_cycles_and_positive_correlation() {
        let values = weekly_series(90);
        let trend = centered_moving_average(&values, 7);
        let detrended: Vec<f64> = values.iter().zip(&trend).map(|(v, t)| v - t).collect();
        let (period, ac) = decomposer().best_candidate_period(&detrended).unwrap();
        assert_eq!(period, 7);
        assert!(ac > 0.5);

        assert_eq!(decomposer().best_candidate_period(&detrended[..13]), None);
        assert_eq!(decomposer().best_candidate_period(&[2.0; 40]), None);
    }

    #[test]
    fn uncovered_cycle_positions_stay_at_zero() {
        let result = decomposer()
            .decompose(&[10.0, 20.0, 10.0, 20.0, 10.0, 20.0])
            .unwrap();
        assert_eq!(result.period, 7);
        assert_eq!(result.seasonal_cycle[6], 0.0);
        let cycle_sum: f64 = result.seasonal_cycle.iter().sum();
        assert_abs_diff_eq!(cycle_sum, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn configurable_candidate_periods() {
        let hourly: Vec<f64> = (0..96)
            .map(|h| 100.0 + 20.0 * (2.0 * PI * h as f64 / 24.0).cos())
            .collect();
        let params = SeasonalityParams {
            candidate_periods: vec![12, 24],
            default_period: 24,
            ..SeasonalityParams::default()
        };
        let result = Decomposer::new(params).unwrap().decompose(&hourly).unwrap();
        assert_eq!(result.period, 24);
    }

    #[test]
    fn flat_series_decomposes_to_its_level() {
        let result = decomposer().decompose(&[5.0; 20]).unwrap();
        assert!(result.trend.iter().all(|t| *t == 5.0));
        assert!(result.seasonal.iter().all(|s| *s == 0.0));
        assert!(result.residual.iter().all(|r| *r == 0.0));
    }

    #[test]
    fn does_not_modify_input_and_rejects_empty() {
        let values = weekly_series(30);
        let copy = values.clone();
        let result = decomposer().decompose(&values).unwrap();
        assert_eq!(values, copy);
        assert_eq!(result.original, copy);

        assert_eq!(
            decomposer().decompose(&[]),
            Err(DecompositionError::InsufficientData {
                required: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn rejects_invalid_params() {
        let params = SeasonalityParams {
            candidate_periods: vec![],
            ..SeasonalityParams::default()
        };
        assert!(matches!(
            Decomposer::new(params),
            Err(DecompositionError::InvalidParameters(_))
        ));
    }

    proptest! {
        #[test]
        fn components_rebuild_the_original(values in prop::collection::vec(-1.0e4..1.0e4f64, 1..200)) {
            let result = decomposer().decompose(&values).unwrap();
            prop_assert_eq!(result.trend.len(), values.len());
            prop_assert_eq!(result.seasonal.len(), values.len());
            prop_assert_eq!(result.residual.len(), values.len());
            for i in 0..values.len() {
                let rebuilt = result.trend[i] + result.seasonal[i] + result.residual[i];
                prop_assert!((rebuilt - values[i]).abs() <= 1e-9 * values[i].abs().max(1.0));
            }
        }

        #[test]
        fn one_seasonal_cycle_sums_to_zero(values in prop::collection::vec(-1.0e3..1.0e3f64, 14..150)) {
            let result = decomposer().decompose(&values).unwrap();
            let cycle_sum: f64 = result.seasonal_cycle.iter().sum();
            prop_assert!(cycle_sum.abs() < 1e-8);
        }
    }
}
