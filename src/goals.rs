//! Goal materializer
//!
//! Converts structured goal descriptors into persisted goal records. The
//! descriptors come either from the text-generation collaborator's parsed
//! JSON output or from per-sport templates for users without AI
//! integration. A batch is all-or-nothing: if the collaborator's output
//! fails to parse as the expected structure, nothing is persisted.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate;
use crate::llm::{extract_json, ClaudeClient, LlmError};
use crate::models::goal::{Goal, NewGoal};
use crate::models::session::{SessionRecord, Sport, ALL_SPORTS};
use crate::store::{SeriesStore, StoreError};

/// Records per sport sampled into the goal-generation prompt.
const RECENT_WINDOW: i64 = 5;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum GoalError {
  #[error("failed to parse goal descriptors: {0}")]
  Parse(String),

  #[error(transparent)]
  Llm(#[from] LlmError),

  #[error(transparent)]
  Store(#[from] StoreError),
}

/// ---------------------------------------------------------------------------
/// Goal Descriptors
/// ---------------------------------------------------------------------------

/// One structured goal as produced by the collaborator (or a template):
/// sport, description, numeric target, and a timeframe in weeks. `metric`
/// optionally names the tracked field so progress can start from the
/// athlete's latest value instead of 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDescriptor {
  pub goal_type: Sport,
  pub goal_description: String,
  pub target_value: f64,
  /// Weeks until the target date
  pub timeframe: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metric: Option<String>,
}

/// Parse the collaborator's response into descriptors. Any malformed entry
/// rejects the whole batch.
pub fn parse_goal_descriptors(text: &str) -> Result<Vec<GoalDescriptor>, GoalError> {
  let json = extract_json(text).map_err(|e| GoalError::Parse(e.to_string()))?;
  let descriptors: Vec<GoalDescriptor> =
    serde_json::from_str(&json).map_err(|e| GoalError::Parse(format!("{}: {}", e, json)))?;

  for descriptor in &descriptors {
    if descriptor.timeframe < 1 {
      return Err(GoalError::Parse(format!(
        "timeframe must be at least 1 week (got {})",
        descriptor.timeframe
      )));
    }
    if !descriptor.target_value.is_finite() || descriptor.target_value < 0.0 {
      return Err(GoalError::Parse(format!(
        "target_value must be a non-negative number (got {})",
        descriptor.target_value
      )));
    }
  }

  Ok(descriptors)
}

/// ---------------------------------------------------------------------------
/// Materialization
/// ---------------------------------------------------------------------------

/// Turn a descriptor into an insertable goal record. The target date is
/// `today + timeframe weeks`; the starting value is the latest value of the
/// referenced metric in the matching series, or 0 when unknown.
pub fn materialize(
  user_id: &str,
  descriptor: &GoalDescriptor,
  series: &[SessionRecord],
  today: NaiveDate,
) -> NewGoal {
  let current_value = descriptor
    .metric
    .as_deref()
    .map(|metric| aggregate::latest(series, metric))
    .unwrap_or(0.0);

  NewGoal {
    user_id: user_id.to_string(),
    sport: descriptor.goal_type,
    description: descriptor.goal_description.clone(),
    target_value: descriptor.target_value,
    current_value,
    target_date: today + Duration::weeks(descriptor.timeframe),
  }
}

/// Generate goals from the collaborator and persist them atomically.
///
/// Returns an empty batch (without calling the collaborator) when the user
/// has no history at all; parse failures reject the batch with nothing
/// saved.
pub async fn generate_goals(
  store: &SeriesStore,
  client: &ClaudeClient,
  user_id: &str,
) -> Result<Vec<Goal>, GoalError> {
  let mut history = Vec::new();
  for sport in ALL_SPORTS {
    let series = store.query(user_id, sport, Some(RECENT_WINDOW)).await?;
    if !series.is_empty() {
      history.push((sport, series));
    }
  }

  if history.is_empty() {
    tracing::info!(user_id, "no history, skipping goal generation");
    return Ok(Vec::new());
  }

  let payload: serde_json::Value = history
    .iter()
    .map(|(sport, series)| {
      let views: Vec<_> = series.iter().map(SessionRecord::view).collect();
      (
        sport.as_str().to_string(),
        serde_json::to_value(views).unwrap_or_default(),
      )
    })
    .collect::<serde_json::Map<_, _>>()
    .into();

  let system_prompt = include_str!("prompts/goals_system.txt");
  let user_message = format!(
    "Generate 3 training goals from this athlete's recent sessions:\n\n{}",
    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
  );

  let (response, _) = client.complete(system_prompt, &user_message, 1024).await?;
  let descriptors = parse_goal_descriptors(&response)?;

  let today = Utc::now().date_naive();
  let mut batch = Vec::with_capacity(descriptors.len());
  for descriptor in &descriptors {
    let series = history
      .iter()
      .find(|(sport, _)| *sport == descriptor.goal_type)
      .map(|(_, series)| series.as_slice())
      .unwrap_or(&[]);
    batch.push(materialize(user_id, descriptor, series, today));
  }

  Ok(store.insert_goals(&batch).await?)
}

/// ---------------------------------------------------------------------------
/// Template Goals
/// ---------------------------------------------------------------------------

/// Canned descriptors for sports without AI integration.
pub fn template_goals(sport: Sport) -> Vec<GoalDescriptor> {
  match sport {
    Sport::Basketball => vec![
      GoalDescriptor {
        goal_type: Sport::Basketball,
        goal_description: "Raise field goal percentage to 50%".into(),
        target_value: 50.0,
        timeframe: 4,
        metric: Some("derived.fieldGoalPct".into()),
      },
      GoalDescriptor {
        goal_type: Sport::Basketball,
        goal_description: "Hold free throw percentage above 80%".into(),
        target_value: 80.0,
        timeframe: 6,
        metric: Some("derived.freeThrowPct".into()),
      },
    ],
    Sport::Football => vec![GoalDescriptor {
      goal_type: Sport::Football,
      goal_description: "Raise completion rate to 65%".into(),
      target_value: 65.0,
      timeframe: 6,
      metric: Some("derived.completionRate".into()),
    }],
    Sport::Soccer => vec![GoalDescriptor {
      goal_type: Sport::Soccer,
      goal_description: "Raise pass accuracy to 85%".into(),
      target_value: 85.0,
      timeframe: 6,
      metric: Some("derived.passAccuracy".into()),
    }],
    Sport::Strength => vec![GoalDescriptor {
      goal_type: Sport::Strength,
      goal_description: "Increase total session volume by 10%".into(),
      target_value: 0.0,
      timeframe: 4,
      metric: Some("derived.totalVolume".into()),
    }],
  }
}

/// Materialize and persist the template goals for one sport.
pub async fn generate_template_goals(
  store: &SeriesStore,
  user_id: &str,
  sport: Sport,
) -> Result<Vec<Goal>, GoalError> {
  let series = store.query(user_id, sport, Some(RECENT_WINDOW)).await?;
  let today = Utc::now().date_naive();

  let batch: Vec<NewGoal> = template_goals(sport)
    .iter()
    .map(|descriptor| materialize(user_id, descriptor, &series, today))
    .collect();

  Ok(store.insert_goals(&batch).await?)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
