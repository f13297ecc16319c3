use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnomalyError {
    #[error("Not enough data to detect anomalies: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Anomaly detector received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Statistics error during anomaly detection: {0}")]
    Statistics(#[from] statistics::StatsError),
}
