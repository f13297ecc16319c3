use thiserror::Error;

/// Errors raised while building core values from untrusted input (files, CLI flags).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown {kind} '{name}', expected one of: {expected}")]
    UnknownName {
        kind: &'static str,
        name: String,
        expected: String,
    },

    #[error("Value {value} at timestamp {timestamp} is not a finite number")]
    NonFiniteValue { timestamp: i64, value: f64 },
}
