//! # Stockcast Forecaster
//!
//! Predicts future values of a series with one of five models, each returning point
//! forecasts together with a lower/upper band:
//!
//! | Method | Forecast | Band |
//! |---|---|---|
//! | `MovingAverage` | mean of the last `window` values | ±10% (heuristic) |
//! | `ExponentialSmoothing` | last smoothed level | ±15% (heuristic) |
//! | `WeightedAverage` | linearly weighted mean of the last `window` values | −12% / +8% (heuristic) |
//! | `LinearRegression` | OLS line extrapolated | `± z·SE·√(1 + 1/n)` |
//! | `Seasonal` | trend line + seasonal cycle, floored at 0 | `± z·σ_residual·√(1 + 1/n)` |
//!
//! Only the two model-based bands carry a confidence `level`; the percentage bands are
//! rules of thumb. Every band satisfies `lower ≤ forecast ≤ upper`.

pub mod accuracy;
pub mod error;
pub mod forecaster;
pub mod result;

pub use accuracy::ForecastAccuracy;
pub use core_types::ForecastMethod;
pub use error::ForecastError;
pub use forecaster::Forecaster;
pub use result::{ConfidenceInterval, ForecastResult};
