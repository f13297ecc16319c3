use analytics::{ComparisonReport, SeriesReport};
use anomaly::{AnomalyResult, DeviationMetric};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use decomposition::DecompositionResult;
use forecasting::{ForecastAccuracy, ForecastResult};
use patterns::{CorrelationResult, CycleInfo, SeasonalityInfo, StepChange};
use statistics::StatisticalSummary;
use trend::TrendResult;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn num(v: f64) -> String {
    format!("{:.4}", v)
}

fn opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), num)
}

pub fn summary(s: &StatisticalSummary) -> Table {
    let mut t = table(vec!["Statistic", "Value"]);
    let rows: Vec<(&str, String)> = vec![
        ("count", s.count.to_string()),
        ("sum", num(s.sum)),
        ("mean", num(s.mean)),
        ("median", num(s.median)),
        ("mode", opt(s.mode)),
        ("min", num(s.min)),
        ("max", num(s.max)),
        ("range", num(s.range)),
        ("variance", num(s.variance)),
        ("std dev", num(s.std_dev)),
        ("q1", num(s.quartiles.q1)),
        ("q3", num(s.quartiles.q3)),
        ("iqr", num(s.quartiles.iqr)),
        ("p5", num(s.percentiles.p5)),
        ("p10", num(s.percentiles.p10)),
        ("p90", num(s.percentiles.p90)),
        ("p95", num(s.percentiles.p95)),
        ("p99", num(s.percentiles.p99)),
        ("cv %", num(s.coefficient_of_variation)),
    ];
    for (name, value) in rows {
        t.add_row(vec![name.to_string(), value]);
    }
    t
}

pub fn trend(r: &TrendResult) -> Table {
    let mut t = table(vec!["Field", "Value"]);
    t.add_row(vec!["kind".to_string(), r.kind.to_string()]);
    t.add_row(vec!["slope".to_string(), num(r.slope)]);
    t.add_row(vec!["intercept".to_string(), num(r.intercept)]);
    t.add_row(vec!["r²".to_string(), num(r.r_squared)]);
    t.add_row(vec!["direction".to_string(), r.direction.to_string()]);
    t.add_row(vec!["strength".to_string(), r.strength.to_string()]);
    if let Some(exp) = &r.exponential {
        t.add_row(vec!["a".to_string(), num(exp.coefficient_a)]);
        t.add_row(vec!["b".to_string(), num(exp.exponent_b)]);
        t.add_row(vec!["growth %".to_string(), num(exp.growth_rate_percent)]);
    }
    if let Some(poly) = &r.polynomial {
        t.add_row(vec![
            "y".to_string(),
            format!("{}·x² + {}·x + {}", num(poly.a), num(poly.b), num(poly.c)),
        ]);
    }
    t
}

/// One row per observation; `limit` keeps only the most recent rows.
pub fn decomposition(d: &DecompositionResult, limit: Option<usize>) -> Table {
    let mut t = table(vec!["#", "original", "trend", "seasonal", "residual"]);
    let start = limit.map_or(0, |l| d.len().saturating_sub(l));
    for i in start..d.len() {
        t.add_row(vec![
            i.to_string(),
            num(d.original[i]),
            num(d.trend[i]),
            num(d.seasonal[i]),
            num(d.residual[i]),
        ]);
    }
    t
}

pub fn forecast(r: &ForecastResult) -> Table {
    let level = r
        .confidence_interval
        .level
        .map_or_else(|| "band".to_string(), |l| format!("{:.0}%", l * 100.0));
    let mut t = table(vec!["step", "timestamp", "forecast", "lower", "upper"]);
    for i in 0..r.forecasts.len() {
        t.add_row(vec![
            (i + 1).to_string(),
            r.timestamps[i].to_string(),
            num(r.forecasts[i]),
            num(r.confidence_interval.lower[i]),
            num(r.confidence_interval.upper[i]),
        ]);
    }
    t.add_row(vec![
        Cell::new("method"),
        Cell::new(r.method.to_string()),
        Cell::new("interval"),
        Cell::new(level),
        Cell::new(""),
    ]);
    t
}

pub fn accuracy(results: &[(String, Result<ForecastAccuracy, String>)]) -> Table {
    let mut t = table(vec!["method", "MAE", "RMSE", "MAPE %"]);
    for (method, result) in results {
        match result {
            Ok(a) => t.add_row(vec![method.clone(), num(a.mae), num(a.rmse), opt(a.mape)]),
            Err(e) => t.add_row(vec![method.clone(), e.clone(), String::new(), String::new()]),
        };
    }
    t
}

pub fn anomalies(r: &AnomalyResult) -> Table {
    let mut t = table(vec!["#", "timestamp", "value", "metric", "severity", "expected"]);
    for a in &r.anomalies {
        let metric = match a.metric {
            DeviationMetric::ZScore(z) => format!("z = {}", num(z)),
            DeviationMetric::ModifiedZScore(z) => format!("modified z = {}", num(z)),
            DeviationMetric::Deviation(d) => format!("deviation = {}", num(d)),
        };
        let expected = a
            .expected_range
            .map_or_else(|| "-".to_string(), |range| format!("[{}, {}]", num(range.lower), num(range.upper)));
        t.add_row(vec![
            a.index.to_string(),
            a.timestamp.to_string(),
            num(a.value),
            metric,
            a.severity.to_string(),
            expected,
        ]);
    }
    t
}

pub fn seasonality(s: &SeasonalityInfo) -> Table {
    let mut t = table(vec!["Seasonality", "Value"]);
    t.add_row(vec!["seasonal".to_string(), s.is_seasonal.to_string()]);
    t.add_row(vec![
        "period".to_string(),
        s.period.map_or_else(|| "-".to_string(), |p| p.to_string()),
    ]);
    t.add_row(vec!["strength".to_string(), num(s.strength)]);
    t.add_row(vec!["variance".to_string(), num(s.variance)]);
    t
}

pub fn cycles(c: &CycleInfo) -> Table {
    let mut t = table(vec!["Cycles", "Value"]);
    t.add_row(vec!["peaks".to_string(), c.peaks.len().to_string()]);
    t.add_row(vec!["troughs".to_string(), c.troughs.len().to_string()]);
    t.add_row(vec!["average length".to_string(), opt(c.average_cycle_length)]);
    t
}

pub fn step_changes(changes: &[StepChange]) -> Table {
    let mut t = table(vec!["#", "from", "to", "change", "change %", "local σ"]);
    for s in changes {
        t.add_row(vec![
            s.index.to_string(),
            num(s.previous_value),
            num(s.value),
            num(s.change),
            opt(s.percent_change),
            num(s.local_std_dev),
        ]);
    }
    t
}

pub fn correlation(c: &CorrelationResult) -> Table {
    let mut t = table(vec!["Correlation", "Value"]);
    t.add_row(vec!["coefficient".to_string(), num(c.correlation_coefficient)]);
    t.add_row(vec!["covariance".to_string(), num(c.covariance)]);
    t.add_row(vec!["strength".to_string(), c.strength.to_string()]);
    t.add_row(vec!["direction".to_string(), c.direction.to_string()]);
    t
}

pub fn comparison(r: &ComparisonReport) -> Vec<Table> {
    let mut means = table(vec!["", "series a", "series b"]);
    means.add_row(vec!["points".to_string(), r.points.to_string(), r.points.to_string()]);
    means.add_row(vec!["mean".to_string(), num(r.summary_a.mean), num(r.summary_b.mean)]);
    means.add_row(vec!["std dev".to_string(), num(r.summary_a.std_dev), num(r.summary_b.std_dev)]);
    vec![means, correlation(&r.correlation)]
}

/// Every section of the report that was produced, in pipeline order.
pub fn report(r: &SeriesReport) -> Vec<(&'static str, Table)> {
    let mut sections = vec![("Summary", summary(&r.summary))];
    if let Some(t) = &r.trend {
        sections.push(("Trend", trend(t)));
    }
    if let Some(s) = &r.seasonality {
        sections.push(("Seasonality", seasonality(s)));
    }
    if let Some(f) = &r.forecast {
        sections.push(("Forecast", forecast(f)));
    }
    if let Some(a) = &r.anomalies {
        sections.push(("Anomalies", anomalies(a)));
    }
    if let Some(c) = &r.cycles {
        sections.push(("Cycles", cycles(c)));
    }
    if let Some(s) = &r.step_changes {
        sections.push(("Step changes", step_changes(s)));
    }
    sections
}
