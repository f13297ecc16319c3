//! # Stockcast Anomaly Detector
//!
//! Flags outlying observations with one of four interchangeable methods:
//!
//! - `Statistical`: distance from the mean beyond `sensitivity · σ`.
//! - `Iqr`: outside the Tukey fences `[Q1 − m·IQR, Q3 + m·IQR]`.
//! - `ZScore`: `|z| > threshold`, each point scored against the other points.
//! - `Mad`: modified z-score `0.6745 · (v − median) / MAD` beyond a threshold.
//!
//! A series without spread (zero σ or zero MAD) is not an error: the result is empty
//! and carries a `note` explaining why.

pub mod detector;
pub mod error;
pub mod result;

pub use core_types::AnomalyMethod;
pub use detector::AnomalyDetector;
pub use error::AnomalyError;
pub use result::{AnomalyRecord, AnomalyResult, DeviationMetric, ExpectedRange};
