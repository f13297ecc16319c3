use crate::error::StatsError;
use crate::summary::Quartiles;

/// Returns a sorted copy of `values`. The input slice is never reordered.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    ensure_not_empty(values, "mean")?;
    Ok(sum(values) / values.len() as f64)
}

/// Middle value of the sample; the average of the two middle values for even counts.
pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    ensure_not_empty(values, "median")?;
    Ok(median_of_sorted(&sorted_copy(values)))
}

/// The most frequent value, or `None` when no value occurs more than once.
///
/// Values are compared exactly. When several values share the highest frequency the
/// smallest of them is returned, so the result does not depend on input order.
pub fn mode(values: &[f64]) -> Option<f64> {
    let sorted = sorted_copy(values);

    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|v| **v == value).count();
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }

    best.filter(|(_, count)| *count > 1).map(|(value, _)| value)
}

/// Population variance around a precomputed `mean` (divides by `n`).
///
/// Returns 0 for an empty slice.
pub fn variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Result<f64, StatsError> {
    let m = mean(values)?;
    Ok(variance(values, m).sqrt())
}

/// The `p`th percentile (`0 ≤ p ≤ 100`) with linear interpolation between the two
/// sorted values bracketing index `(p / 100) · (n − 1)`.
pub fn percentile(values: &[f64], p: f64) -> Result<f64, StatsError> {
    ensure_not_empty(values, "percentile")?;
    if !(0.0..=100.0).contains(&p) {
        return Err(StatsError::InvalidInput(format!(
            "percentile must be within [0, 100], got {}",
            p
        )));
    }
    Ok(percentile_of_sorted(&sorted_copy(values), p))
}

/// Quartiles by the exclusive method.
///
/// Q1 is the median of the first ⌊n/2⌋ sorted values and Q3 the median of the last
/// ⌈n/2⌉ sorted values. A single value is every quartile of itself.
pub fn quartiles(values: &[f64]) -> Result<Quartiles, StatsError> {
    ensure_not_empty(values, "quartiles")?;
    Ok(quartiles_of_sorted(&sorted_copy(values)))
}

pub(crate) fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

pub(crate) fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let index = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = index - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

pub(crate) fn quartiles_of_sorted(sorted: &[f64]) -> Quartiles {
    let n = sorted.len();
    let q2 = median_of_sorted(sorted);
    if n == 1 {
        return Quartiles {
            q1: q2,
            q2,
            q3: q2,
            iqr: 0.0,
        };
    }

    let q1 = median_of_sorted(&sorted[..n / 2]);
    let q3 = median_of_sorted(&sorted[n / 2..]);
    Quartiles {
        q1,
        q2,
        q3,
        iqr: q3 - q1,
    }
}

fn ensure_not_empty(values: &[f64], what: &str) -> Result<(), StatsError> {
    if values.is_empty() {
        return Err(StatsError::InvalidInput(format!(
            "cannot compute the {} of an empty sample",
            what
        )));
    }
    Ok(())
}
