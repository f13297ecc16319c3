use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Invalid input for statistics: {0}")]
    InvalidInput(String),
}
