mod input;
mod render;

use analytics::AnalyticsEngine;
use anomaly::AnomalyMethod;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use configuration::AnalysisConfig;
use core_types::TrendKind;
use forecasting::ForecastMethod;
use serde::Serialize;
use std::path::PathBuf;
use trend::TrendAnalyzer;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Stockcast analysis tool.
fn main() -> Result<()> {
    // Load RUST_LOG and STOCKCAST__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Logs go to stderr so that --json output stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let engine = AnalyticsEngine::new(config).context("Invalid analysis configuration")?;
    let output = Output { json: cli.json };

    match cli.command {
        Commands::Summary(args) => handle_summary(args, output),
        Commands::Trend(args) => handle_trend(args, output),
        Commands::Decompose(args) => handle_decompose(&engine, args, output),
        Commands::Forecast(args) => handle_forecast(&engine, args, output),
        Commands::Evaluate(args) => handle_evaluate(&engine, args, output),
        Commands::Anomalies(args) => handle_anomalies(&engine, args, output),
        Commands::Patterns(args) => handle_patterns(&engine, args, output),
        Commands::Correlate(args) => handle_correlate(&engine, args, output),
        Commands::Report(args) => handle_report(&engine, args, output),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Statistical analysis and forecasting for time series.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file. Defaults to ./stockcast.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Descriptive statistics of the series.
    Summary(InputArgs),
    /// Fit a trend line or curve.
    Trend(TrendArgs),
    /// Split the series into trend, seasonal and residual components.
    Decompose(DecomposeArgs),
    /// Forecast future values with confidence bounds.
    Forecast(ForecastArgs),
    /// Backtest forecast methods on the most recent observations.
    Evaluate(EvaluateArgs),
    /// Flag outliers.
    Anomalies(AnomalyArgs),
    /// Seasonality, cycles and step changes.
    Patterns(InputArgs),
    /// Correlate two series of equal length.
    Correlate(CorrelateArgs),
    /// Run the full analysis pipeline.
    Report(ReportArgs),
}

#[derive(Args)]
struct InputArgs {
    /// CSV file of `timestamp,value` rows (or a single value column), or a JSON array
    /// of `{"timestamp": .., "value": ..}` objects.
    #[arg(long, short)]
    input: PathBuf,
}

#[derive(Args)]
struct TrendArgs {
    #[command(flatten)]
    input: InputArgs,

    /// linear, exponential or polynomial.
    #[arg(long, default_value_t = TrendKind::Linear)]
    kind: TrendKind,
}

#[derive(Args)]
struct DecomposeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Only show the most recent rows.
    #[arg(long)]
    tail: Option<usize>,
}

#[derive(Args)]
struct ForecastArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Number of steps to forecast.
    #[arg(long, default_value_t = 7)]
    periods: usize,

    /// moving-average, exponential-smoothing, weighted-average, linear-regression or
    /// seasonal. Defaults to the configured method.
    #[arg(long)]
    method: Option<ForecastMethod>,
}

#[derive(Args)]
struct EvaluateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Number of trailing observations to hold out.
    #[arg(long, default_value_t = 7)]
    holdout: usize,

    /// Evaluate only this method instead of all of them.
    #[arg(long)]
    method: Option<ForecastMethod>,
}

#[derive(Args)]
struct AnomalyArgs {
    #[command(flatten)]
    input: InputArgs,

    /// statistical, iqr, z-score or mad. Defaults to the configured method.
    #[arg(long)]
    method: Option<AnomalyMethod>,

    /// Detect on the decomposition residual instead of the raw values.
    #[arg(long)]
    residual: bool,
}

#[derive(Args)]
struct CorrelateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// The second series.
    #[arg(long)]
    other: PathBuf,
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Number of steps to forecast; 0 skips the forecast.
    #[arg(long, default_value_t = 7)]
    horizon: usize,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    /// Prints `value` as JSON, or the tables built from it.
    fn emit<T: Serialize>(&self, value: &T, tables: impl FnOnce(&T) -> Vec<Table>) -> Result<()> {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(value).context("Failed to serialize output")?
            );
        } else {
            for table in tables(value) {
                println!("{table}");
            }
        }
        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => configuration::load_config_from(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => configuration::load_config().context("Failed to load configuration"),
    }
}

fn handle_summary(args: InputArgs, output: Output) -> Result<()> {
    let points = input::load_points(&args.input)?;
    let summary = statistics::summary(&core_types::values(&points))?;
    output.emit(&summary, |s| vec![render::summary(s)])
}

fn handle_trend(args: TrendArgs, output: Output) -> Result<()> {
    let points = input::load_points(&args.input.input)?;
    let fit = TrendAnalyzer::fit_series(&points, args.kind)
        .with_context(|| format!("Failed to fit a {} trend", args.kind))?;
    output.emit(&fit, |f| vec![render::trend(f)])
}

fn handle_decompose(engine: &AnalyticsEngine, args: DecomposeArgs, output: Output) -> Result<()> {
    let points = input::load_points(&args.input.input)?;
    let result = engine.decomposer().decompose_series(&points)?;
    if !output.json {
        println!(
            "Period {} (autocorrelation {:.4})",
            result.period, result.autocorrelation
        );
    }
    output.emit(&result, |r| vec![render::decomposition(r, args.tail)])
}

fn handle_forecast(engine: &AnalyticsEngine, args: ForecastArgs, output: Output) -> Result<()> {
    let points = input::load_points(&args.input.input)?;
    let forecaster = engine.forecaster();
    let method = args.method.unwrap_or(forecaster.params().default_method);
    let result = forecaster
        .forecast(&points, args.periods, method)
        .with_context(|| format!("Failed to forecast with {}", method))?;
    output.emit(&result, |r| vec![render::forecast(r)])
}

#[derive(Serialize)]
struct Evaluation {
    method: String,
    accuracy: Option<forecasting::ForecastAccuracy>,
    error: Option<String>,
}

fn handle_evaluate(engine: &AnalyticsEngine, args: EvaluateArgs, output: Output) -> Result<()> {
    let points = input::load_points(&args.input.input)?;
    let methods: Vec<ForecastMethod> = match args.method {
        Some(method) => vec![method],
        None => ForecastMethod::ALL.to_vec(),
    };

    let results: Vec<(String, Result<forecasting::ForecastAccuracy, String>)> = methods
        .into_iter()
        .map(|method| {
            let result = engine
                .forecaster()
                .evaluate(&points, args.holdout, method)
                .map_err(|e| e.to_string());
            (method.to_string(), result)
        })
        .collect();

    if output.json {
        let evaluations: Vec<Evaluation> = results
            .into_iter()
            .map(|(method, result)| match result {
                Ok(accuracy) => Evaluation {
                    method,
                    accuracy: Some(accuracy),
                    error: None,
                },
                Err(error) => Evaluation {
                    method,
                    accuracy: None,
                    error: Some(error),
                },
            })
            .collect();
        output.emit(&evaluations, |_| Vec::new())
    } else {
        println!("{}", render::accuracy(&results));
        Ok(())
    }
}

fn handle_anomalies(engine: &AnalyticsEngine, args: AnomalyArgs, output: Output) -> Result<()> {
    let points = input::load_points(&args.input.input)?;
    let method = args
        .method
        .unwrap_or(engine.detector().params().default_method);

    let result = if args.residual {
        engine.detect_residual_anomalies(&points, method)?
    } else {
        engine.detector().detect(&points, method)?
    };

    if !output.json {
        println!(
            "{} of {} points flagged by {}",
            result.anomaly_count(),
            result.total_points,
            result.method
        );
        if let Some(note) = &result.note {
            println!("{}", note);
        }
    }
    output.emit(&result, |r| vec![render::anomalies(r)])
}

#[derive(Serialize)]
struct PatternsOutput {
    seasonality: Option<patterns::SeasonalityInfo>,
    cycles: patterns::CycleInfo,
    step_changes: Vec<patterns::StepChange>,
}

fn handle_patterns(engine: &AnalyticsEngine, args: InputArgs, output: Output) -> Result<()> {
    let points = input::load_points(&args.input)?;
    let values = core_types::values(&points);
    let detector = engine.patterns();

    let seasonality = match detector.detect_seasonality(&values) {
        Ok(info) => Some(info),
        Err(patterns::PatternError::InsufficientData { .. }) => None,
        Err(e) => return Err(e.into()),
    };
    let result = PatternsOutput {
        seasonality,
        cycles: detector.detect_cycles(&values)?,
        step_changes: detector.detect_step_changes(&values)?,
    };

    output.emit(&result, |r| {
        let mut tables = Vec::new();
        if let Some(s) = &r.seasonality {
            tables.push(render::seasonality(s));
        }
        tables.push(render::cycles(&r.cycles));
        tables.push(render::step_changes(&r.step_changes));
        tables
    })
}

fn handle_correlate(engine: &AnalyticsEngine, args: CorrelateArgs, output: Output) -> Result<()> {
    let a = input::load_points(&args.input.input)?;
    let b = input::load_points(&args.other)?;
    let report = engine.compare(&a, &b)?;
    output.emit(&report, render::comparison)
}

fn handle_report(engine: &AnalyticsEngine, args: ReportArgs, output: Output) -> Result<()> {
    let points = input::load_points(&args.input.input)?;
    let report = engine.analyze(&points, args.horizon)?;

    if output.json {
        return output.emit(&report, |_| Vec::new());
    }
    for (title, table) in render::report(&report) {
        println!("--- {} ---", title);
        println!("{table}");
    }
    for reason in &report.skipped {
        println!("skipped {}", reason);
    }
    Ok(())
}
