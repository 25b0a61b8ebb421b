//! Session records: one logged game or workout per sport
//!
//! The stat payload is a tagged sum type over the four supported sports so
//! field access is exhaustively checked per sport instead of duck-typed.
//! Counters are validated once at construction; derived metrics are
//! recomputed from counters on every read and never stored as ground truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::{percentage, training_volume};

/// ---------------------------------------------------------------------------
/// Sport Tag
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
  Basketball,
  Football,
  Soccer,
  Strength,
}

/// All supported sports, in display order.
pub const ALL_SPORTS: [Sport; 4] = [
  Sport::Basketball,
  Sport::Football,
  Sport::Soccer,
  Sport::Strength,
];

impl Sport {
  pub fn as_str(&self) -> &'static str {
    match self {
      Sport::Basketball => "basketball",
      Sport::Football => "football",
      Sport::Soccer => "soccer",
      Sport::Strength => "strength",
    }
  }
}

impl std::fmt::Display for Sport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Validation Errors
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ValidationError {
  #[error("{field} must be non-negative (got {value})")]
  Negative { field: &'static str, value: f64 },

  #[error("{made_field} ({made}) exceeds {attempted_field} ({attempted})")]
  MadeExceedsAttempted {
    made_field: &'static str,
    made: i64,
    attempted_field: &'static str,
    attempted: i64,
  },
}

fn non_negative(field: &'static str, value: i64) -> Result<(), ValidationError> {
  if value < 0 {
    return Err(ValidationError::Negative {
      field,
      value: value as f64,
    });
  }
  Ok(())
}

fn non_negative_f64(field: &'static str, value: f64) -> Result<(), ValidationError> {
  if value < 0.0 {
    return Err(ValidationError::Negative { field, value });
  }
  Ok(())
}

/// Made counters must not exceed their attempted counterpart. Violations are
/// errors, never silently clamped.
fn made_le_attempted(
  made_field: &'static str,
  made: i64,
  attempted_field: &'static str,
  attempted: i64,
) -> Result<(), ValidationError> {
  if made > attempted {
    return Err(ValidationError::MadeExceedsAttempted {
      made_field,
      made,
      attempted_field,
      attempted,
    });
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Per-Sport Counter Payloads
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasketballStats {
  pub points: i64,
  pub rebounds: i64,
  pub assists: i64,
  pub steals: i64,
  pub blocks: i64,
  pub turnovers: i64,
  pub field_goals_made: i64,
  pub field_goals_attempted: i64,
  pub three_pointers_made: i64,
  pub three_pointers_attempted: i64,
  pub free_throws_made: i64,
  pub free_throws_attempted: i64,
  pub minutes_played: i64,
  pub vertical_jump: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FootballStats {
  // Passing
  pub passing_yards: i64,
  pub passing_touchdowns: i64,
  pub interceptions: i64,
  pub completions: i64,
  pub attempts: i64,
  // Rushing
  pub rushing_yards: i64,
  pub rushing_touchdowns: i64,
  pub rushing_attempts: i64,
  // Receiving
  pub receiving_yards: i64,
  pub receiving_touchdowns: i64,
  pub receptions: i64,
  pub targets: i64,
  // Defense
  pub tackles: i64,
  pub assisted_tackles: i64,
  pub sacks: i64,
  pub interceptions_defense: i64,
  pub pass_deflections: i64,
  pub forced_fumbles: i64,
  pub fumble_recoveries: i64,
  // Kicking
  pub field_goals_made: i64,
  pub field_goals_attempted: i64,
  pub extra_points_made: i64,
  pub extra_points_attempted: i64,
  pub punting_yards: i64,
  pub punts: i64,
  pub kickoff_return_yards: i64,
  pub punt_return_yards: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoccerStats {
  pub goals: i64,
  pub assists: i64,
  pub shots: i64,
  pub shots_on_target: i64,
  pub passes: i64,
  pub passes_completed: i64,
  pub crosses: i64,
  pub crosses_completed: i64,
  pub tackles: i64,
  pub interceptions: i64,
  pub clearances: i64,
  pub blocks: i64,
  pub fouls: i64,
  pub fouls_suffered: i64,
  pub yellow_cards: i64,
  pub red_cards: i64,
  // Goalkeepers
  pub saves: i64,
  pub goals_against: i64,
  pub minutes_played: i64,
  /// Distance covered in km
  pub distance_covered: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Exercise {
  pub name: String,
  pub sets: i64,
  pub reps: i64,
  pub weight: f64,
  /// Rest between sets, in seconds
  pub rest_time: i64,
  pub notes: Option<String>,
}

impl Exercise {
  /// Volume contribution of this exercise: sets x reps x weight
  pub fn volume(&self) -> f64 {
    training_volume(self.sets, self.reps, self.weight)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrengthStats {
  pub workout_type: String,
  /// Duration in minutes
  pub duration: i64,
  pub body_weight: f64,
  pub average_heart_rate: i64,
  pub max_heart_rate: i64,
  pub calories_burned: i64,
  pub exercises: Vec<Exercise>,
}

/// ---------------------------------------------------------------------------
/// Tagged Sum Type over Sports
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sport", rename_all = "lowercase")]
pub enum SportStats {
  Basketball(BasketballStats),
  Football(FootballStats),
  Soccer(SoccerStats),
  Strength(StrengthStats),
}

impl SportStats {
  pub fn sport(&self) -> Sport {
    match self {
      SportStats::Basketball(_) => Sport::Basketball,
      SportStats::Football(_) => Sport::Football,
      SportStats::Soccer(_) => Sport::Soccer,
      SportStats::Strength(_) => Sport::Strength,
    }
  }

  /// Validate all counters: non-negative, and every made <= attempted pair.
  pub fn validate(&self) -> Result<(), ValidationError> {
    match self {
      SportStats::Basketball(s) => s.validate(),
      SportStats::Football(s) => s.validate(),
      SportStats::Soccer(s) => s.validate(),
      SportStats::Strength(s) => s.validate(),
    }
  }

  /// Recompute derived metrics from the raw counters.
  pub fn derived(&self) -> DerivedMetrics {
    match self {
      SportStats::Basketball(s) => DerivedMetrics::Basketball(s.derived()),
      SportStats::Football(s) => DerivedMetrics::Football(s.derived()),
      SportStats::Soccer(s) => DerivedMetrics::Soccer(s.derived()),
      SportStats::Strength(s) => DerivedMetrics::Strength(s.derived()),
    }
  }

  /// Resolve a raw counter by its camelCase name.
  pub fn counter(&self, name: &str) -> Option<f64> {
    match self {
      SportStats::Basketball(s) => s.counter(name),
      SportStats::Football(s) => s.counter(name),
      SportStats::Soccer(s) => s.counter(name),
      SportStats::Strength(s) => s.counter(name),
    }
  }
}

impl BasketballStats {
  pub fn validate(&self) -> Result<(), ValidationError> {
    non_negative("points", self.points)?;
    non_negative("rebounds", self.rebounds)?;
    non_negative("assists", self.assists)?;
    non_negative("steals", self.steals)?;
    non_negative("blocks", self.blocks)?;
    non_negative("turnovers", self.turnovers)?;
    non_negative("fieldGoalsMade", self.field_goals_made)?;
    non_negative("fieldGoalsAttempted", self.field_goals_attempted)?;
    non_negative("threePointersMade", self.three_pointers_made)?;
    non_negative("threePointersAttempted", self.three_pointers_attempted)?;
    non_negative("freeThrowsMade", self.free_throws_made)?;
    non_negative("freeThrowsAttempted", self.free_throws_attempted)?;
    non_negative("minutesPlayed", self.minutes_played)?;
    non_negative("verticalJump", self.vertical_jump)?;

    made_le_attempted(
      "fieldGoalsMade",
      self.field_goals_made,
      "fieldGoalsAttempted",
      self.field_goals_attempted,
    )?;
    made_le_attempted(
      "threePointersMade",
      self.three_pointers_made,
      "threePointersAttempted",
      self.three_pointers_attempted,
    )?;
    made_le_attempted(
      "freeThrowsMade",
      self.free_throws_made,
      "freeThrowsAttempted",
      self.free_throws_attempted,
    )?;

    Ok(())
  }

  pub fn derived(&self) -> BasketballDerived {
    BasketballDerived {
      field_goal_pct: percentage(self.field_goals_made, self.field_goals_attempted),
      three_point_pct: percentage(self.three_pointers_made, self.three_pointers_attempted),
      free_throw_pct: percentage(self.free_throws_made, self.free_throws_attempted),
    }
  }

  fn counter(&self, name: &str) -> Option<f64> {
    let value = match name {
      "points" => self.points,
      "rebounds" => self.rebounds,
      "assists" => self.assists,
      "steals" => self.steals,
      "blocks" => self.blocks,
      "turnovers" => self.turnovers,
      "fieldGoalsMade" => self.field_goals_made,
      "fieldGoalsAttempted" => self.field_goals_attempted,
      "threePointersMade" => self.three_pointers_made,
      "threePointersAttempted" => self.three_pointers_attempted,
      "freeThrowsMade" => self.free_throws_made,
      "freeThrowsAttempted" => self.free_throws_attempted,
      "minutesPlayed" => self.minutes_played,
      "verticalJump" => self.vertical_jump,
      _ => return None,
    };
    Some(value as f64)
  }
}

impl FootballStats {
  pub fn validate(&self) -> Result<(), ValidationError> {
    non_negative("passingYards", self.passing_yards)?;
    non_negative("passingTouchdowns", self.passing_touchdowns)?;
    non_negative("interceptions", self.interceptions)?;
    non_negative("completions", self.completions)?;
    non_negative("attempts", self.attempts)?;
    non_negative("rushingYards", self.rushing_yards)?;
    non_negative("rushingTouchdowns", self.rushing_touchdowns)?;
    non_negative("rushingAttempts", self.rushing_attempts)?;
    non_negative("receivingYards", self.receiving_yards)?;
    non_negative("receivingTouchdowns", self.receiving_touchdowns)?;
    non_negative("receptions", self.receptions)?;
    non_negative("targets", self.targets)?;
    non_negative("tackles", self.tackles)?;
    non_negative("assistedTackles", self.assisted_tackles)?;
    non_negative("sacks", self.sacks)?;
    non_negative("interceptionsDefense", self.interceptions_defense)?;
    non_negative("passDeflections", self.pass_deflections)?;
    non_negative("forcedFumbles", self.forced_fumbles)?;
    non_negative("fumbleRecoveries", self.fumble_recoveries)?;
    non_negative("fieldGoalsMade", self.field_goals_made)?;
    non_negative("fieldGoalsAttempted", self.field_goals_attempted)?;
    non_negative("extraPointsMade", self.extra_points_made)?;
    non_negative("extraPointsAttempted", self.extra_points_attempted)?;
    non_negative("puntingYards", self.punting_yards)?;
    non_negative("punts", self.punts)?;
    non_negative("kickoffReturnYards", self.kickoff_return_yards)?;
    non_negative("puntReturnYards", self.punt_return_yards)?;

    made_le_attempted("completions", self.completions, "attempts", self.attempts)?;
    made_le_attempted("receptions", self.receptions, "targets", self.targets)?;
    made_le_attempted(
      "fieldGoalsMade",
      self.field_goals_made,
      "fieldGoalsAttempted",
      self.field_goals_attempted,
    )?;
    made_le_attempted(
      "extraPointsMade",
      self.extra_points_made,
      "extraPointsAttempted",
      self.extra_points_attempted,
    )?;

    Ok(())
  }

  pub fn derived(&self) -> FootballDerived {
    FootballDerived {
      completion_rate: percentage(self.completions, self.attempts),
      catch_rate: percentage(self.receptions, self.targets),
      field_goal_pct: percentage(self.field_goals_made, self.field_goals_attempted),
      extra_point_pct: percentage(self.extra_points_made, self.extra_points_attempted),
    }
  }

  fn counter(&self, name: &str) -> Option<f64> {
    let value = match name {
      "passingYards" => self.passing_yards,
      "passingTouchdowns" => self.passing_touchdowns,
      "interceptions" => self.interceptions,
      "completions" => self.completions,
      "attempts" => self.attempts,
      "rushingYards" => self.rushing_yards,
      "rushingTouchdowns" => self.rushing_touchdowns,
      "rushingAttempts" => self.rushing_attempts,
      "receivingYards" => self.receiving_yards,
      "receivingTouchdowns" => self.receiving_touchdowns,
      "receptions" => self.receptions,
      "targets" => self.targets,
      "tackles" => self.tackles,
      "assistedTackles" => self.assisted_tackles,
      "sacks" => self.sacks,
      "interceptionsDefense" => self.interceptions_defense,
      "passDeflections" => self.pass_deflections,
      "forcedFumbles" => self.forced_fumbles,
      "fumbleRecoveries" => self.fumble_recoveries,
      "fieldGoalsMade" => self.field_goals_made,
      "fieldGoalsAttempted" => self.field_goals_attempted,
      "extraPointsMade" => self.extra_points_made,
      "extraPointsAttempted" => self.extra_points_attempted,
      "puntingYards" => self.punting_yards,
      "punts" => self.punts,
      "kickoffReturnYards" => self.kickoff_return_yards,
      "puntReturnYards" => self.punt_return_yards,
      _ => return None,
    };
    Some(value as f64)
  }
}

impl SoccerStats {
  pub fn validate(&self) -> Result<(), ValidationError> {
    non_negative("goals", self.goals)?;
    non_negative("assists", self.assists)?;
    non_negative("shots", self.shots)?;
    non_negative("shotsOnTarget", self.shots_on_target)?;
    non_negative("passes", self.passes)?;
    non_negative("passesCompleted", self.passes_completed)?;
    non_negative("crosses", self.crosses)?;
    non_negative("crossesCompleted", self.crosses_completed)?;
    non_negative("tackles", self.tackles)?;
    non_negative("interceptions", self.interceptions)?;
    non_negative("clearances", self.clearances)?;
    non_negative("blocks", self.blocks)?;
    non_negative("fouls", self.fouls)?;
    non_negative("foulsSuffered", self.fouls_suffered)?;
    non_negative("yellowCards", self.yellow_cards)?;
    non_negative("redCards", self.red_cards)?;
    non_negative("saves", self.saves)?;
    non_negative("goalsAgainst", self.goals_against)?;
    non_negative("minutesPlayed", self.minutes_played)?;
    non_negative_f64("distanceCovered", self.distance_covered)?;

    made_le_attempted("shotsOnTarget", self.shots_on_target, "shots", self.shots)?;
    made_le_attempted("passesCompleted", self.passes_completed, "passes", self.passes)?;
    made_le_attempted("crossesCompleted", self.crosses_completed, "crosses", self.crosses)?;

    Ok(())
  }

  pub fn derived(&self) -> SoccerDerived {
    SoccerDerived {
      pass_accuracy: percentage(self.passes_completed, self.passes),
      shot_accuracy: percentage(self.shots_on_target, self.shots),
      cross_accuracy: percentage(self.crosses_completed, self.crosses),
    }
  }

  fn counter(&self, name: &str) -> Option<f64> {
    let value = match name {
      "goals" => self.goals,
      "assists" => self.assists,
      "shots" => self.shots,
      "shotsOnTarget" => self.shots_on_target,
      "passes" => self.passes,
      "passesCompleted" => self.passes_completed,
      "crosses" => self.crosses,
      "crossesCompleted" => self.crosses_completed,
      "tackles" => self.tackles,
      "interceptions" => self.interceptions,
      "clearances" => self.clearances,
      "blocks" => self.blocks,
      "fouls" => self.fouls,
      "foulsSuffered" => self.fouls_suffered,
      "yellowCards" => self.yellow_cards,
      "redCards" => self.red_cards,
      "saves" => self.saves,
      "goalsAgainst" => self.goals_against,
      "minutesPlayed" => self.minutes_played,
      "distanceCovered" => return Some(self.distance_covered),
      _ => return None,
    };
    Some(value as f64)
  }
}

impl StrengthStats {
  pub fn validate(&self) -> Result<(), ValidationError> {
    non_negative("duration", self.duration)?;
    non_negative_f64("bodyWeight", self.body_weight)?;
    non_negative("averageHeartRate", self.average_heart_rate)?;
    non_negative("maxHeartRate", self.max_heart_rate)?;
    non_negative("caloriesBurned", self.calories_burned)?;

    for exercise in &self.exercises {
      non_negative("sets", exercise.sets)?;
      non_negative("reps", exercise.reps)?;
      non_negative_f64("weight", exercise.weight)?;
      non_negative("restTime", exercise.rest_time)?;
    }

    Ok(())
  }

  pub fn derived(&self) -> StrengthDerived {
    StrengthDerived {
      total_volume: self.exercises.iter().map(Exercise::volume).sum(),
    }
  }

  fn counter(&self, name: &str) -> Option<f64> {
    match name {
      "duration" => Some(self.duration as f64),
      "bodyWeight" => Some(self.body_weight),
      "averageHeartRate" => Some(self.average_heart_rate as f64),
      "maxHeartRate" => Some(self.max_heart_rate as f64),
      "caloriesBurned" => Some(self.calories_burned as f64),
      _ => None,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Derived Metrics (recomputed on every read)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DerivedMetrics {
  Basketball(BasketballDerived),
  Football(FootballDerived),
  Soccer(SoccerDerived),
  Strength(StrengthDerived),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketballDerived {
  pub field_goal_pct: f64,
  pub three_point_pct: f64,
  pub free_throw_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootballDerived {
  pub completion_rate: f64,
  pub catch_rate: f64,
  pub field_goal_pct: f64,
  pub extra_point_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoccerDerived {
  pub pass_accuracy: f64,
  pub shot_accuracy: f64,
  pub cross_accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthDerived {
  pub total_volume: f64,
}

impl DerivedMetrics {
  /// Resolve a derived metric by its camelCase name.
  pub fn field(&self, name: &str) -> Option<f64> {
    match self {
      DerivedMetrics::Basketball(d) => match name {
        "fieldGoalPct" => Some(d.field_goal_pct),
        "threePointPct" => Some(d.three_point_pct),
        "freeThrowPct" => Some(d.free_throw_pct),
        _ => None,
      },
      DerivedMetrics::Football(d) => match name {
        "completionRate" => Some(d.completion_rate),
        "catchRate" => Some(d.catch_rate),
        "fieldGoalPct" => Some(d.field_goal_pct),
        "extraPointPct" => Some(d.extra_point_pct),
        _ => None,
      },
      DerivedMetrics::Soccer(d) => match name {
        "passAccuracy" => Some(d.pass_accuracy),
        "shotAccuracy" => Some(d.shot_accuracy),
        "crossAccuracy" => Some(d.cross_accuracy),
        _ => None,
      },
      DerivedMetrics::Strength(d) => match name {
        "totalVolume" => Some(d.total_volume),
        _ => None,
      },
    }
  }
}

/// ---------------------------------------------------------------------------
/// Session Record
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
  pub id: String,
  pub user_id: String,
  pub date: DateTime<Utc>,
  pub notes: Option<String>,
  pub stats: SportStats,
}

impl SessionRecord {
  /// Validated construction. Assigns a fresh id; pure, no persistence.
  pub fn new(
    user_id: impl Into<String>,
    date: DateTime<Utc>,
    notes: Option<String>,
    stats: SportStats,
  ) -> Result<Self, ValidationError> {
    Self::with_id(uuid::Uuid::new_v4().to_string(), user_id, date, notes, stats)
  }

  /// Validated construction with a caller-supplied id (imports, replays).
  pub fn with_id(
    id: impl Into<String>,
    user_id: impl Into<String>,
    date: DateTime<Utc>,
    notes: Option<String>,
    stats: SportStats,
  ) -> Result<Self, ValidationError> {
    stats.validate()?;
    Ok(Self {
      id: id.into(),
      user_id: user_id.into(),
      date,
      notes,
      stats,
    })
  }

  pub fn sport(&self) -> Sport {
    self.stats.sport()
  }

  /// Derived metrics, always recomputed from counters.
  pub fn derived(&self) -> DerivedMetrics {
    self.stats.derived()
  }

  /// Resolve a field by name: raw counters and derived metrics share one
  /// namespace, with an optional `derived.` prefix forcing the latter.
  pub fn field(&self, name: &str) -> Option<f64> {
    if let Some(derived_name) = name.strip_prefix("derived.") {
      return self.derived().field(derived_name);
    }
    self
      .stats
      .counter(name)
      .or_else(|| self.derived().field(name))
  }

  /// Raw + derived serialization used for prompts and export.
  pub fn view(&self) -> SessionView<'_> {
    SessionView {
      id: &self.id,
      user_id: &self.user_id,
      date: self.date,
      notes: self.notes.as_deref(),
      stats: &self.stats,
      derived: self.derived(),
    }
  }
}

/// Serialized form of a record with derived metrics attached. The `stats`
/// payload flattens to the record's top level along with its sport tag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<'a> {
  pub id: &'a str,
  pub user_id: &'a str,
  pub date: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes: Option<&'a str>,
  #[serde(flatten)]
  pub stats: &'a SportStats,
  pub derived: DerivedMetrics,
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn basketball_stats() -> SportStats {
    SportStats::Basketball(BasketballStats {
      points: 25,
      field_goals_made: 10,
      field_goals_attempted: 20,
      three_pointers_made: 2,
      three_pointers_attempted: 6,
      free_throws_made: 3,
      free_throws_attempted: 4,
      rebounds: 7,
      assists: 4,
      ..Default::default()
    })
  }

  #[test]
  fn test_valid_record_computes_derived() {
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
    let record = SessionRecord::new("user-1", date, None, basketball_stats()).unwrap();

    match record.derived() {
      DerivedMetrics::Basketball(d) => {
        assert_eq!(d.field_goal_pct, 50.0);
        assert_eq!(d.free_throw_pct, 75.0);
      }
      other => panic!("wrong derived variant: {:?}", other),
    }
  }

  #[test]
  fn test_made_exceeding_attempted_is_rejected() {
    let stats = SportStats::Basketball(BasketballStats {
      field_goals_made: 11,
      field_goals_attempted: 10,
      ..Default::default()
    });
    let err = stats.validate().unwrap_err();
    assert!(matches!(err, ValidationError::MadeExceedsAttempted { .. }));
  }

  #[test]
  fn test_negative_counter_is_rejected() {
    let stats = SportStats::Soccer(SoccerStats {
      goals: -1,
      ..Default::default()
    });
    let err = stats.validate().unwrap_err();
    assert!(matches!(err, ValidationError::Negative { field: "goals", .. }));
  }

  #[test]
  fn test_soccer_pair_checks() {
    let stats = SportStats::Soccer(SoccerStats {
      shots: 3,
      shots_on_target: 5,
      ..Default::default()
    });
    assert!(stats.validate().is_err());
  }

  #[test]
  fn test_strength_total_volume() {
    let stats = StrengthStats {
      exercises: vec![
        Exercise {
          name: "Bench Press".into(),
          sets: 3,
          reps: 10,
          weight: 135.0,
          ..Default::default()
        },
        Exercise {
          name: "Row".into(),
          sets: 3,
          reps: 8,
          weight: 95.0,
          ..Default::default()
        },
      ],
      ..Default::default()
    };
    assert_eq!(stats.derived().total_volume, 6330.0);
  }

  #[test]
  fn test_field_lookup_with_derived_prefix() {
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
    let record = SessionRecord::new("user-1", date, None, basketball_stats()).unwrap();

    assert_eq!(record.field("points"), Some(25.0));
    assert_eq!(record.field("derived.fieldGoalPct"), Some(50.0));
    // Bare derived names resolve too
    assert_eq!(record.field("fieldGoalPct"), Some(50.0));
    assert_eq!(record.field("nonsense"), None);
  }

  #[test]
  fn test_sport_tag_serialization() {
    let stats = basketball_stats();
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["sport"], "basketball");
    assert_eq!(json["fieldGoalsMade"], 10);

    let back: SportStats = serde_json::from_value(json).unwrap();
    assert_eq!(back, stats);
  }

  #[test]
  fn test_missing_counters_default_to_zero() {
    let json = r#"{"sport":"football","passingYards":250,"completions":18,"attempts":30}"#;
    let stats: SportStats = serde_json::from_str(json).unwrap();
    match &stats {
      SportStats::Football(f) => {
        assert_eq!(f.passing_yards, 250);
        assert_eq!(f.tackles, 0);
      }
      other => panic!("wrong variant: {:?}", other),
    }
    match stats.derived() {
      DerivedMetrics::Football(d) => assert_eq!(d.completion_rate, 60.0),
      other => panic!("wrong derived variant: {:?}", other),
    }
  }

  #[test]
  fn test_view_includes_derived() {
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
    let record = SessionRecord::new("user-1", date, Some("good game".into()), basketball_stats())
      .unwrap();
    let json = serde_json::to_value(record.view()).unwrap();
    assert_eq!(json["sport"], "basketball");
    assert_eq!(json["derived"]["fieldGoalPct"], 50.0);
    assert_eq!(json["userId"], "user-1");
  }
}
