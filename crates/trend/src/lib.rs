//! # Stockcast Trend Analyzer
//!
//! Least-squares trend fitting over paired samples.
//!
//! - `Linear`: ordinary least squares, `y = slope·x + intercept`.
//! - `Exponential`: `y = a·e^(b·x)`, fitted as a line through `(x, ln y)`.
//! - `Polynomial`: `y = a·x² + b·x + c`, an SVD least squares solve (`nalgebra`) on
//!   rescaled x, so raw unix timestamps fit as well as ordinal positions.
//!
//! Degenerate input never yields NaN: flat series report R² = 0, identical x values
//! report slope 0, and non-positive values in an exponential fit are treated as
//! `ln y = 0` (a documented approximation).

pub mod analyzer;
pub mod error;
pub mod result;
mod solver;

pub use analyzer::TrendAnalyzer;
pub use error::TrendError;
pub use result::{ExponentialFit, PolynomialFit, TrendResult};
