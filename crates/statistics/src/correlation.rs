use crate::error::StatsError;

/// Normalized autocorrelation of `values` at `lag`:
/// `Σ(x[i] − m)(x[i+lag] − m) / Σ(x[i] − m)²`.
///
/// The numerator runs over the overlapping indices only, the denominator over the
/// whole series. Returns 0 when `lag ≥ n` or the series has zero variance.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    let n = values.len();
    if n == 0 || lag >= n {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let denominator: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    if denominator == 0.0 {
        return 0.0;
    }

    let numerator: f64 = values
        .iter()
        .zip(values[lag..].iter())
        .map(|(a, b)| (a - mean) * (b - mean))
        .sum();

    numerator / denominator
}

/// Population covariance of two equally long samples.
pub fn covariance(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    if a.len() != b.len() {
        return Err(StatsError::InvalidInput(format!(
            "covariance needs samples of equal length, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(StatsError::InvalidInput(
            "cannot compute the covariance of empty samples".to_string(),
        ));
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / n)
}
