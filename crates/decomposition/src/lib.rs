//! # Stockcast Decomposer
//!
//! Additive decomposition of a series into trend, seasonal and residual components:
//!
//! 1. Trend: centred moving average over `min(7, ⌊n/3⌋)` points, shrinking at the
//!    boundaries instead of padding.
//! 2. Seasonal: the detrended series averaged by position within the period, centred
//!    so one cycle sums to zero, then tiled. The period is the configured candidate
//!    with the highest positive autocorrelation of the detrended series.
//! 3. Residual: whatever is left, so `trend + seasonal + residual` rebuilds the input.

pub mod decomposer;
pub mod error;
pub mod result;

pub use decomposer::Decomposer;
pub use error::DecompositionError;
pub use result::DecompositionResult;
