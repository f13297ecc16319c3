use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Cannot analyze an empty series")]
    EmptySeries,

    #[error("Invalid analysis configuration: {0}")]
    Config(#[from] configuration::ConfigError),

    #[error(transparent)]
    Statistics(#[from] statistics::StatsError),

    #[error(transparent)]
    Trend(#[from] trend::TrendError),

    #[error(transparent)]
    Decomposition(#[from] decomposition::DecompositionError),

    #[error(transparent)]
    Forecast(#[from] forecasting::ForecastError),

    #[error(transparent)]
    Anomaly(#[from] anomaly::AnomalyError),

    #[error(transparent)]
    Pattern(#[from] patterns::PatternError),
}
