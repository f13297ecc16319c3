use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or a value did not deserialize into its setting.
    #[error("Failed to load analysis settings: {0}")]
    LoadError(#[from] config::ConfigError),

    /// A setting parsed but lies outside its valid range.
    #[error("Invalid analysis setting: {0}")]
    ValidationError(String),
}
