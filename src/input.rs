use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use core_types::TimeSeriesPoint;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads a series from a `.json` array of points or from CSV.
///
/// CSV rows are `timestamp,value` behind a header row. A single-column file is read as
/// values only, indexed by row.
pub fn load_points(path: &Path) -> Result<Vec<TimeSeriesPoint>> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let points = if is_json {
        read_json(file).with_context(|| format!("Failed to parse JSON points in {:?}", path))?
    } else {
        read_csv(file).with_context(|| format!("Failed to parse CSV points in {:?}", path))?
    };

    if points.is_empty() {
        bail!("{:?} contains no data points", path);
    }
    tracing::debug!(points = points.len(), ?path, "Loaded series");
    Ok(points)
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<TimeSeriesPoint>> {
    let points: Vec<TimeSeriesPoint> = serde_json::from_reader(reader)?;
    for (i, p) in points.iter().enumerate() {
        TimeSeriesPoint::checked(p.timestamp(), p.value())
            .with_context(|| format!("point {}", i))?;
    }
    Ok(points)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<TimeSeriesPoint>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // Row numbers in messages count the header as line 1.
        let line = row + 2;
        let field = |i: usize| record.get(i).filter(|f| !f.is_empty());
        let point = match (field(0), field(1)) {
            (Some(ts), Some(value)) => {
                let timestamp = parse_timestamp(ts).with_context(|| format!("line {}", line))?;
                parse_point(timestamp, value).with_context(|| format!("line {}", line))?
            }
            (Some(value), None) if record.len() == 1 => {
                parse_point(row as i64, value).with_context(|| format!("line {}", line))?
            }
            (None, None) => continue,
            _ => bail!("line {}: expected `timestamp,value`", line),
        };
        points.push(point);
    }
    Ok(points)
}

fn parse_point(timestamp: i64, value: &str) -> Result<TimeSeriesPoint> {
    let value: f64 = value
        .parse()
        .with_context(|| format!("invalid value {:?}", value))?;
    Ok(TimeSeriesPoint::checked(timestamp, value)?)
}

/// Integer timestamps are taken as they are; `YYYY-MM-DD` dates become unix seconds
/// at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Result<i64> {
    if let Ok(ts) = raw.parse::<i64>() {
        return Ok(ts);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid timestamp {:?}: expected an integer or YYYY-MM-DD", raw))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid date {:?}", raw))?;
    Ok(midnight.and_utc().timestamp())
}
