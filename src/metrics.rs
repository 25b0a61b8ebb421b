//! Deterministic metric formulas
//!
//! Pure math over raw session counters. Every function here is total:
//! no panics, no NaN, no Infinity. A ratio with a zero denominator is
//! defined as 0. Negative inputs are rejected at the session validation
//! boundary, not here.

/// Ratio of made to attempted, as a percentage in [0, 100].
///
/// Zero attempts means 0, uniformly. Full precision is kept for
/// averaging; round only at presentation with [`round1`].
pub fn percentage(made: i64, attempted: i64) -> f64 {
  if attempted > 0 {
    made as f64 / attempted as f64 * 100.0
  } else {
    0.0
  }
}

/// Volume of one exercise: sets x reps x weight.
pub fn training_volume(sets: i64, reps: i64, weight: f64) -> f64 {
  sets as f64 * reps as f64 * weight
}

/// Round to one decimal place for display.
pub fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}
