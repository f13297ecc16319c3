use crate::descriptive::{
    median_of_sorted, mode, percentile_of_sorted, quartiles_of_sorted, sorted_copy, variance,
};
use crate::error::StatsError;
use serde::{Deserialize, Serialize};

/// A complete descriptive summary of a sample. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    /// `None` when every value occurs exactly once.
    pub mode: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Population variance.
    pub variance: f64,
    pub std_dev: f64,
    pub quartiles: Quartiles,
    pub percentiles: Percentiles,
    /// Standard deviation as a percentage of |mean|; 0 when the mean is 0.
    pub coefficient_of_variation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Computes the full `StatisticalSummary` of `values`.
///
/// # Errors
///
/// `StatsError::InvalidInput` when `values` is empty.
pub fn summary(values: &[f64]) -> Result<StatisticalSummary, StatsError> {
    if values.is_empty() {
        return Err(StatsError::InvalidInput(
            "cannot summarize an empty sample".to_string(),
        ));
    }

    let sorted = sorted_copy(values);
    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;
    let variance = variance(values, mean);
    let std_dev = variance.sqrt();
    let min = sorted[0];
    let max = sorted[count - 1];

    let coefficient_of_variation = if mean != 0.0 {
        std_dev / mean.abs() * 100.0
    } else {
        0.0
    };

    let p = |pct: f64| percentile_of_sorted(&sorted, pct);

    Ok(StatisticalSummary {
        count,
        sum,
        mean,
        median: median_of_sorted(&sorted),
        mode: mode(values),
        min,
        max,
        range: max - min,
        variance,
        std_dev,
        quartiles: quartiles_of_sorted(&sorted),
        percentiles: Percentiles {
            p5: p(5.0),
            p10: p(10.0),
            p25: p(25.0),
            p50: p(50.0),
            p75: p(75.0),
            p90: p(90.0),
            p95: p(95.0),
            p99: p(99.0),
        },
        coefficient_of_variation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn summary_of_small_sample() {
        let s = summary(&[4.0, 1.0, 3.0, 2.0, 2.0]).unwrap();
        assert_eq!(s.count, 5);
        assert_eq!(s.sum, 12.0);
        assert_relative_eq!(s.mean, 2.4);
        assert_eq!(s.median, 2.0);
        assert_eq!(s.mode, Some(2.0));
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.range, 3.0);
        assert_relative_eq!(s.variance, 1.04, epsilon = 1e-12);
        assert_relative_eq!(s.std_dev, 1.04f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(
            s.coefficient_of_variation,
            1.04f64.sqrt() / 2.4 * 100.0,
            epsilon = 1e-9
        );
        assert_eq!(s.percentiles.p50, s.median);
    }

    #[test]
    fn summary_of_single_value() {
        let s = summary(&[7.5]).unwrap();
        assert_eq!(s.variance, 0.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.median, 7.5);
        assert_eq!(s.mode, None);
        assert_eq!(s.percentiles.p99, 7.5);
        assert_eq!(s.quartiles.iqr, 0.0);
    }

    #[test]
    fn zero_mean_has_zero_coefficient_of_variation() {
        let s = summary(&[-1.0, 1.0]).unwrap();
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.coefficient_of_variation, 0.0);
    }

    #[test]
    fn percentiles_are_monotonic() {
        let values: Vec<f64> = (0..37).map(|i| ((i * 17) % 37) as f64).collect();
        let p = summary(&values).unwrap().percentiles;
        let ordered = [p.p5, p.p10, p.p25, p.p50, p.p75, p.p90, p.p95, p.p99];
        assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_sample_is_invalid() {
        assert!(matches!(summary(&[]), Err(StatsError::InvalidInput(_))));
    }
}
