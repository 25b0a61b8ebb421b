use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::session::Sport;

/// A persisted training goal. Mutated only by marking completion or
/// updating progress; never auto-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Goal {
  pub id: String,
  pub user_id: String,
  pub sport: String,
  pub description: String,
  pub target_value: f64,
  pub current_value: f64,
  pub target_date: NaiveDate,
  pub completed: bool,
  pub created_at: Option<DateTime<Utc>>,
}

/// For inserting new goals (without id, created_at)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
  pub user_id: String,
  pub sport: Sport,
  pub description: String,
  pub target_value: f64,
  pub current_value: f64,
  pub target_date: NaiveDate,
}
