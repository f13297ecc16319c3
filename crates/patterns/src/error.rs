use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error("Not enough data to detect {pattern}: need at least {required} points, got {actual}")]
    InsufficientData {
        pattern: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Pattern detector received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Decomposition failed during pattern detection: {0}")]
    Decomposition(#[from] decomposition::DecompositionError),

    #[error("Statistics error during pattern detection: {0}")]
    Statistics(#[from] statistics::StatsError),
}
