use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    AnalysisConfig, AnomalyParams, ForecastParams, SeasonalityParams, StepChangeParams,
};

/// Prefix of the environment variables that override file settings, e.g.
/// `STOCKCAST__ANOMALY__SENSITIVITY=2.5`.
pub const ENV_PREFIX: &str = "STOCKCAST";

/// Loads the analysis configuration from an optional `stockcast.toml` in the working
/// directory, with environment overrides on top.
///
/// A missing file is not an error: every setting has a default.
pub fn load_config() -> Result<AnalysisConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("stockcast").required(false))
        .add_source(environment());
    finish(builder)
}

/// Loads the analysis configuration from the given file (which must exist), with
/// environment overrides on top.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(environment());
    finish(builder)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("seasonality.candidate_periods")
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<AnalysisConfig, ConfigError> {
    // Attempt to deserialize the entire configuration into our `AnalysisConfig` struct
    let config = builder.build()?.try_deserialize::<AnalysisConfig>()?;
    config.validate()?;
    Ok(config)
}
