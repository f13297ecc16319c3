use crate::result::PolynomialFit;
use nalgebra::{DMatrix, DVector};

/// Singular values below this fraction of the largest one count as zero.
const RANK_TOLERANCE: f64 = 1e-10;

/// Least squares quadratic through `(x[i], y[i])`, solved by SVD.
///
/// The design matrix is built on `u = (x − centre) / half_range`, which lies in
/// `[-1, 1]`, so unix-second timestamps are as well conditioned as ordinal positions.
/// The coefficients are expanded back into powers of `x`; the fitted values are
/// returned alongside, evaluated in `u` where no cancellation occurs.
///
/// Returns `None` when the quadratic term is not identifiable (fewer than three
/// distinct x values).
pub(crate) fn least_squares_quadratic(
    x: &[f64],
    y: &[f64],
) -> Option<(PolynomialFit, Vec<f64>)> {
    let min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let half_range = (max - min) / 2.0;
    if !(half_range > 0.0) {
        return None;
    }
    let centre = min + half_range;

    let u: Vec<f64> = x.iter().map(|xi| (xi - centre) / half_range).collect();
    let design = DMatrix::from_fn(x.len(), 3, |row, power| u[row].powi(power as i32));
    let svd = design.clone().svd(true, true);
    let tolerance = svd.singular_values.max() * RANK_TOLERANCE;
    if svd.rank(tolerance) < 3 {
        return None;
    }
    let beta = svd.solve(&DVector::from_column_slice(y), tolerance).ok()?;
    let fitted: Vec<f64> = (&design * &beta).iter().copied().collect();

    // y = a_u·u² + b_u·u + c_u with u = (x − centre) / half_range.
    let (c_u, b_u, a_u) = (beta[0], beta[1], beta[2]);
    let a = a_u / (half_range * half_range);
    let linear = b_u / half_range;
    let coefficients = PolynomialFit {
        a,
        b: linear - 2.0 * a * centre,
        c: a * centre * centre - linear * centre + c_u,
    };
    Some((coefficients, fitted))
}
