//! # Stockcast Analytics Engine
//!
//! Runs the whole analysis pipeline over one series and gathers the results in a
//! single `SeriesReport`.
//!
//! ## Architectural Principles
//!
//! - **Orchestration only:** every number is computed by the analysis crates. This
//!   crate decides which of them have enough data to run and in which order.
//! - **Partial reports over failures:** a short series still gets every section it has
//!   data for. Sections that were not run are `None` and explained in `skipped`.
//! - **Stateless calls:** the engine holds only its configured components; concurrent
//!   calls on one engine share nothing mutable.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: builds the components from an `AnalysisConfig` and runs them.
//! - `SeriesReport`, `ComparisonReport`: the serializable outputs.
//! - `AnalyticsError`: wraps the errors of every analysis crate.

pub mod engine;
pub mod error;
pub mod report;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{ComparisonReport, SeriesReport};
