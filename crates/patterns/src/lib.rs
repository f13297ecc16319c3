//! # Stockcast Pattern Detector
//!
//! Structural insights about a series beyond its trend:
//!
//! - seasonality (is there a repeating cycle, and at which period),
//! - cycles (peaks and troughs, and the typical distance between peaks),
//! - step changes (sudden level shifts relative to recent volatility),
//! - correlation between two series.

pub mod detector;
pub mod error;
pub mod result;

pub use detector::PatternDetector;
pub use error::PatternError;
pub use result::{CorrelationResult, CycleInfo, SeasonalityInfo, StepChange};
pub use statistics::autocorrelation;
