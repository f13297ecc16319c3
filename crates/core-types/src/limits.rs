//! Minimum series lengths required by each family of analysis.

pub const MIN_POINTS_TREND: usize = 2;
pub const MIN_POINTS_FORECAST: usize = 3;
pub const MIN_POINTS_ANOMALY: usize = 5;
pub const MIN_POINTS_SEASONALITY: usize = 14;
/// Local extrema and step changes both need a neighbour on each side.
pub const MIN_POINTS_PATTERNS: usize = 3;
