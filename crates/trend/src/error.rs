use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrendError {
    #[error("Not enough data to fit a trend: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Trend fit received invalid parameters: {0}")]
    InvalidParameters(String),
}
