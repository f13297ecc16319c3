//! # Stockcast Statistics Toolkit
//!
//! Descriptive statistics primitives shared by every analysis crate.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Pure functions over `&[f64]`. No I/O, no logging, no state.
//! - **Copies, never in-place:** order statistics sort a private copy, so callers can
//!   hand in slices they still own and use.
//! - **Population variance everywhere:** `variance` divides by `n`. The anomaly
//!   detectors rely on this same definition for their thresholds.
//!
//! ## Public API
//!
//! - `summary`: the full `StatisticalSummary` of a non-empty sample.
//! - The individual primitives (`mean`, `median`, `percentile`, ...) for callers that
//!   need only one of them.
//! - `autocorrelation`: the lag correlation used for period detection.

pub mod correlation;
pub mod descriptive;
pub mod error;
pub mod summary;

pub use correlation::{autocorrelation, covariance};
pub use descriptive::{
    mean, median, mode, percentile, quartiles, sorted_copy, std_dev, sum, variance,
};
pub use error::StatsError;
pub use summary::{Percentiles, Quartiles, StatisticalSummary, summary};
