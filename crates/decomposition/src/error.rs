use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecompositionError {
    #[error("Not enough data to decompose: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Decomposer received invalid parameters: {0}")]
    InvalidParameters(String),
}
