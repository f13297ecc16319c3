use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Forecaster received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Trend fit failed while forecasting: {0}")]
    Trend(#[from] trend::TrendError),

    #[error("Decomposition failed while forecasting: {0}")]
    Decomposition(#[from] decomposition::DecompositionError),

    #[error("Statistics error while forecasting: {0}")]
    Statistics(#[from] statistics::StatsError),
}
