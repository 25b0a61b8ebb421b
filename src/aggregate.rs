//! Series aggregation: latest value, moving average, trend direction
//!
//! All functions take a most-recent-first slice (the order `SeriesStore`
//! queries return) plus a field name resolved through
//! `SessionRecord::field`. Everything here is pure and total: an empty
//! series yields 0, an unknown field reads as 0, and thin history yields
//! a flat trend rather than an error.

use serde::{Deserialize, Serialize};

use crate::models::session::SessionRecord;

/// Records per side of the trend comparison: the mean of the 3 most recent
/// records against the mean of the 3 before them. Small enough to need
/// little history, wide enough to absorb a single outlier session.
const TREND_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
  Up,
  Down,
  Flat,
}

fn field_or_zero(record: &SessionRecord, field: &str) -> f64 {
  record.field(field).unwrap_or(0.0)
}

/// Field value from the most recent record, or 0 for an empty series.
pub fn latest(series: &[SessionRecord], field: &str) -> f64 {
  series.first().map_or(0.0, |r| field_or_zero(r, field))
}

/// Arithmetic mean over the `window` most recent records (default: all).
pub fn average(series: &[SessionRecord], field: &str, window: Option<usize>) -> f64 {
  let window = window.unwrap_or(series.len()).min(series.len());
  if window == 0 {
    return 0.0;
  }

  let sum: f64 = series[..window]
    .iter()
    .map(|r| field_or_zero(r, field))
    .sum();
  sum / window as f64
}

/// Direction of recent performance: mean of the last 3 records against the
/// mean of the 3 before them. Fewer than 6 records is insufficient history
/// and reads as flat, not as an error.
pub fn trend(series: &[SessionRecord], field: &str) -> Trend {
  if series.len() < TREND_WINDOW * 2 {
    return Trend::Flat;
  }

  let recent = average(&series[..TREND_WINDOW], field, None);
  let prior = average(&series[TREND_WINDOW..TREND_WINDOW * 2], field, None);

  if recent > prior {
    Trend::Up
  } else if recent < prior {
    Trend::Down
  } else {
    Trend::Flat
  }
}

/// ---------------------------------------------------------------------------
/// Overview Summary
/// ---------------------------------------------------------------------------

/// Latest/average/trend triple for one field, as shown on overview cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
  pub latest: f64,
  pub average: f64,
  pub trend: Trend,
}

pub fn summary(series: &[SessionRecord], field: &str) -> FieldSummary {
  FieldSummary {
    latest: latest(series, field),
    average: average(series, field, None),
    trend: trend(series, field),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
