use anomaly::AnomalyResult;
use decomposition::DecompositionResult;
use forecasting::ForecastResult;
use patterns::{CorrelationResult, CycleInfo, SeasonalityInfo, StepChange};
use serde::{Deserialize, Serialize};
use statistics::StatisticalSummary;
use trend::TrendResult;

/// Everything the pipeline could say about one series.
///
/// Each optional section is `None` when the series was too short for it (or, for the
/// forecast, when no horizon was requested); `skipped` then holds one line per
/// missing section saying why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub points: usize,
    pub summary: StatisticalSummary,
    pub trend: Option<TrendResult>,
    pub decomposition: Option<DecompositionResult>,
    pub seasonality: Option<SeasonalityInfo>,
    pub forecast: Option<ForecastResult>,
    pub anomalies: Option<AnomalyResult>,
    pub cycles: Option<CycleInfo>,
    pub step_changes: Option<Vec<StepChange>>,
    pub skipped: Vec<String>,
}

/// How two series of equal length relate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub points: usize,
    pub summary_a: StatisticalSummary,
    pub summary_b: StatisticalSummary,
    pub correlation: CorrelationResult,
}
