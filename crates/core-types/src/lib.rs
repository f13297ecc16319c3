//! # Stockcast Core Types
//!
//! Layer 0 of the workspace: the observation type every analysis consumes and the
//! small qualitative enums shared between the analysis crates.

pub mod enums;
pub mod error;
pub mod limits;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use enums::{
    AnomalyMethod, CorrelationDirection, ForecastMethod, Severity, Strength, TrendDirection,
    TrendKind,
};
pub use error::CoreError;
pub use series::{TimeSeriesPoint, from_values, step, values};
