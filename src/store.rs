//! Per-user series store
//!
//! Persistence boundary for session records and goals, keyed by
//! (user_id, sport). Series are append-only: `append` never overwrites an
//! existing id, edits go through the explicit `replace` operation. Queries
//! return most-recent-first by date with insertion order breaking ties.
//!
//! The store does not validate stat payloads; that happens in
//! `SessionRecord` construction before anything reaches `append`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::DbPool;
use crate::models::goal::{Goal, NewGoal};
use crate::models::session::{SessionRecord, Sport, SportStats, ALL_SPORTS};

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum StoreError {
  #[error("a record with id {0} already exists; use replace to update it")]
  DuplicateId(String),

  #[error("no record with id {0}")]
  MissingId(String),

  #[error("corrupt stats payload for record {id}: {source}")]
  CorruptPayload {
    id: String,
    source: serde_json::Error,
  },

  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}

/// ---------------------------------------------------------------------------
/// Series Store
/// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SeriesStore {
  pool: DbPool,
}

impl SeriesStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Append a validated record to its (user, sport) series.
  ///
  /// An id collision is an error, never a silent overwrite.
  pub async fn append(&self, record: &SessionRecord) -> Result<SessionRecord, StoreError> {
    let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM sessions WHERE id = ?1")
      .bind(&record.id)
      .fetch_optional(&self.pool)
      .await?;

    if exists.is_some() {
      return Err(StoreError::DuplicateId(record.id.clone()));
    }

    let stats_json = serde_json::to_string(&record.stats).map_err(|source| {
      StoreError::CorruptPayload {
        id: record.id.clone(),
        source,
      }
    })?;

    sqlx::query(
      r#"
      INSERT INTO sessions (id, user_id, sport, date, notes, stats_json)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      "#,
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(record.sport().as_str())
    .bind(record.date)
    .bind(&record.notes)
    .bind(&stats_json)
    .execute(&self.pool)
    .await?;

    tracing::debug!(id = %record.id, sport = %record.sport(), "appended session");

    Ok(record.clone())
  }

  /// Append a batch of records atomically: either every record persists or
  /// none. An id collision with an existing row rolls the whole batch back.
  pub async fn append_batch(&self, records: &[SessionRecord]) -> Result<usize, StoreError> {
    let mut tx = self.pool.begin().await?;

    for record in records {
      let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM sessions WHERE id = ?1")
        .bind(&record.id)
        .fetch_optional(&mut *tx)
        .await?;

      if exists.is_some() {
        return Err(StoreError::DuplicateId(record.id.clone()));
      }

      let stats_json = serde_json::to_string(&record.stats).map_err(|source| {
        StoreError::CorruptPayload {
          id: record.id.clone(),
          source,
        }
      })?;

      sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, sport, date, notes, stats_json)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
      )
      .bind(&record.id)
      .bind(&record.user_id)
      .bind(record.sport().as_str())
      .bind(record.date)
      .bind(&record.notes)
      .bind(&stats_json)
      .execute(&mut *tx)
      .await?;
    }

    tx.commit().await?;

    tracing::debug!(count = records.len(), "appended session batch");
    Ok(records.len())
  }

  /// Replace an existing record by id. The explicit edit path.
  pub async fn replace(&self, record: &SessionRecord) -> Result<(), StoreError> {
    let stats_json = serde_json::to_string(&record.stats).map_err(|source| {
      StoreError::CorruptPayload {
        id: record.id.clone(),
        source,
      }
    })?;

    let result = sqlx::query(
      r#"
      UPDATE sessions SET
        user_id = ?2,
        sport = ?3,
        date = ?4,
        notes = ?5,
        stats_json = ?6
      WHERE id = ?1
      "#,
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(record.sport().as_str())
    .bind(record.date)
    .bind(&record.notes)
    .bind(&stats_json)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      return Err(StoreError::MissingId(record.id.clone()));
    }

    Ok(())
  }

  /// Records for one (user, sport) series, most-recent-first by date.
  /// Ties break by insertion order (rowid), keeping the ordering stable.
  pub async fn query(
    &self,
    user_id: &str,
    sport: Sport,
    limit: Option<i64>,
  ) -> Result<Vec<SessionRecord>, StoreError> {
    let limit = limit.unwrap_or(i64::MAX);

    let rows: Vec<(String, String, DateTime<Utc>, Option<String>, String)> = sqlx::query_as(
      r#"
      SELECT id, user_id, date, notes, stats_json
      FROM sessions
      WHERE user_id = ?1 AND sport = ?2
      ORDER BY date DESC, rowid ASC
      LIMIT ?3
      "#,
    )
    .bind(user_id)
    .bind(sport.as_str())
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;

    rows
      .into_iter()
      .map(|(id, user_id, date, notes, stats_json)| {
        let stats: SportStats = serde_json::from_str(&stats_json)
          .map_err(|source| StoreError::CorruptPayload { id: id.clone(), source })?;
        Ok(SessionRecord {
          id,
          user_id,
          date,
          notes,
          stats,
        })
      })
      .collect()
  }

  /// All four series for one user, for overview/summary views.
  /// Sports with no data map to empty series, not errors.
  pub async fn query_all(
    &self,
    user_id: &str,
  ) -> Result<HashMap<Sport, Vec<SessionRecord>>, StoreError> {
    let mut all = HashMap::new();
    for sport in ALL_SPORTS {
      all.insert(sport, self.query(user_id, sport, None).await?);
    }
    Ok(all)
  }

  /// Explicit user-initiated wipe of every series and goal for one user.
  pub async fn wipe(&self, user_id: &str) -> Result<u64, StoreError> {
    let sessions = sqlx::query("DELETE FROM sessions WHERE user_id = ?1")
      .bind(user_id)
      .execute(&self.pool)
      .await?;

    let goals = sqlx::query("DELETE FROM goals WHERE user_id = ?1")
      .bind(user_id)
      .execute(&self.pool)
      .await?;

    let removed = sessions.rows_affected() + goals.rows_affected();
    tracing::info!(user_id, removed, "wiped user data");
    Ok(removed)
  }

  /// ---------------------------------------------------------------------------
  /// Goal Records
  /// ---------------------------------------------------------------------------

  /// Insert a batch of goals atomically: either every goal persists or none.
  pub async fn insert_goals(&self, goals: &[NewGoal]) -> Result<Vec<Goal>, StoreError> {
    let mut tx = self.pool.begin().await?;
    let mut saved = Vec::with_capacity(goals.len());

    for goal in goals {
      let id = uuid::Uuid::new_v4().to_string();
      let created_at = Utc::now();

      sqlx::query(
        r#"
        INSERT INTO goals (id, user_id, sport, description, target_value,
                           current_value, target_date, completed, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)
        "#,
      )
      .bind(&id)
      .bind(&goal.user_id)
      .bind(goal.sport.as_str())
      .bind(&goal.description)
      .bind(goal.target_value)
      .bind(goal.current_value)
      .bind(goal.target_date)
      .bind(created_at)
      .execute(&mut *tx)
      .await?;

      saved.push(Goal {
        id,
        user_id: goal.user_id.clone(),
        sport: goal.sport.as_str().to_string(),
        description: goal.description.clone(),
        target_value: goal.target_value,
        current_value: goal.current_value,
        target_date: goal.target_date,
        completed: false,
        created_at: Some(created_at),
      });
    }

    tx.commit().await?;

    tracing::info!(count = saved.len(), "saved goal batch");
    Ok(saved)
  }

  /// Goals for one user ordered by soonest target date first.
  pub async fn goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>, StoreError> {
    let goals = sqlx::query_as::<_, Goal>(
      r#"
      SELECT id, user_id, sport, description, target_value,
             current_value, target_date, completed, created_at
      FROM goals
      WHERE user_id = ?1
      ORDER BY target_date ASC
      "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(goals)
  }

  pub async fn set_goal_completed(&self, goal_id: &str, completed: bool) -> Result<(), StoreError> {
    let result = sqlx::query("UPDATE goals SET completed = ?2 WHERE id = ?1")
      .bind(goal_id)
      .bind(completed)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(StoreError::MissingId(goal_id.to_string()));
    }
    Ok(())
  }

  pub async fn set_goal_current_value(&self, goal_id: &str, value: f64) -> Result<(), StoreError> {
    let result = sqlx::query("UPDATE goals SET current_value = ?2 WHERE id = ?1")
      .bind(goal_id)
      .bind(value)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(StoreError::MissingId(goal_id.to_string()));
    }
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::session::{BasketballStats, SoccerStats};
  use crate::test_utils::*;
  use chrono::{Duration, TimeZone};
  use serial_test::serial;

  fn basketball_record(user_id: &str, date: DateTime<Utc>, points: i64) -> SessionRecord {
    SessionRecord::new(
      user_id,
      date,
      None,
      SportStats::Basketball(BasketballStats {
        points,
        field_goals_made: 10,
        field_goals_attempted: 20,
        ..Default::default()
      }),
    )
    .unwrap()
  }

  #[tokio::test]
  #[serial]
  async fn test_append_then_query_limit_one() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();

    let record = basketball_record("user-1", date, 25);
    store.append(&record).await.unwrap();

    let got = store
      .query("user-1", Sport::Basketball, Some(1))
      .await
      .unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0], record);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_append_duplicate_id_is_rejected() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();

    let record = basketball_record("user-1", date, 25);
    store.append(&record).await.unwrap();

    let err = store.append(&record).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(_)));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_append_batch_rolls_back_on_duplicate() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();

    let existing = basketball_record("user-1", date, 20);
    store.append(&existing).await.unwrap();

    let fresh = basketball_record("user-1", date + Duration::days(1), 25);
    let err = store
      .append_batch(&[fresh, existing.clone()])
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(_)));

    // Nothing from the failed batch may persist
    let got = store.query("user-1", Sport::Basketball, None).await.unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].id, existing.id);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_replace_updates_by_id() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();

    let mut record = basketball_record("user-1", date, 25);
    store.append(&record).await.unwrap();

    record.notes = Some("corrected box score".into());
    store.replace(&record).await.unwrap();

    let got = store.query("user-1", Sport::Basketball, None).await.unwrap();
    assert_eq!(got[0].notes.as_deref(), Some("corrected box score"));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_replace_missing_id_errors() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();

    let record = basketball_record("user-1", date, 25);
    let err = store.replace(&record).await.unwrap_err();
    assert!(matches!(err, StoreError::MissingId(_)));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_query_orders_most_recent_first_with_stable_ties() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    let d1 = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
    let d2 = d1 + Duration::days(1);

    let first = basketball_record("user-1", d1, 20);
    let second = basketball_record("user-1", d2, 30);
    // Two records sharing d2; insertion order must be preserved between them
    let third = basketball_record("user-1", d2, 35);

    store.append(&first).await.unwrap();
    store.append(&second).await.unwrap();
    store.append(&third).await.unwrap();

    let got = store.query("user-1", Sport::Basketball, None).await.unwrap();
    let ids: Vec<&str> = got.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), third.id.as_str(), first.id.as_str()]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_query_scopes_by_user_and_sport() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();

    store
      .append(&basketball_record("user-1", date, 25))
      .await
      .unwrap();
    store
      .append(&basketball_record("user-2", date, 12))
      .await
      .unwrap();
    let soccer = SessionRecord::new(
      "user-1",
      date,
      None,
      SportStats::Soccer(SoccerStats {
        goals: 2,
        shots: 5,
        shots_on_target: 3,
        ..Default::default()
      }),
    )
    .unwrap();
    store.append(&soccer).await.unwrap();

    let hoops = store.query("user-1", Sport::Basketball, None).await.unwrap();
    assert_eq!(hoops.len(), 1);

    let all = store.query_all("user-1").await.unwrap();
    assert_eq!(all[&Sport::Basketball].len(), 1);
    assert_eq!(all[&Sport::Soccer].len(), 1);
    assert!(all[&Sport::Football].is_empty());
    assert!(all[&Sport::Strength].is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_empty_series_is_not_an_error() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());

    let got = store.query("nobody", Sport::Football, None).await.unwrap();
    assert!(got.is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_wipe_clears_sessions_and_goals() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();

    store
      .append(&basketball_record("user-1", date, 25))
      .await
      .unwrap();
    store
      .insert_goals(&[NewGoal {
        user_id: "user-1".into(),
        sport: Sport::Basketball,
        description: "Raise free throw percentage".into(),
        target_value: 80.0,
        current_value: 70.0,
        target_date: date.date_naive(),
      }])
      .await
      .unwrap();

    let removed = store.wipe("user-1").await.unwrap();
    assert_eq!(removed, 2);

    assert!(store
      .query("user-1", Sport::Basketball, None)
      .await
      .unwrap()
      .is_empty());
    assert!(store.goals_for_user("user-1").await.unwrap().is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_goal_batch_and_updates() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap().date_naive();

    let saved = store
      .insert_goals(&[
        NewGoal {
          user_id: "user-1".into(),
          sport: Sport::Basketball,
          description: "Raise three point percentage".into(),
          target_value: 40.0,
          current_value: 33.0,
          target_date: date + Duration::days(28),
        },
        NewGoal {
          user_id: "user-1".into(),
          sport: Sport::Strength,
          description: "Bench press volume".into(),
          target_value: 8000.0,
          current_value: 6330.0,
          target_date: date + Duration::days(14),
        },
      ])
      .await
      .unwrap();
    assert_eq!(saved.len(), 2);

    // Ordered by soonest target date
    let goals = store.goals_for_user("user-1").await.unwrap();
    assert_eq!(goals[0].sport, "strength");
    assert!(!goals[0].completed);

    store.set_goal_completed(&goals[0].id, true).await.unwrap();
    store
      .set_goal_current_value(&goals[1].id, 36.0)
      .await
      .unwrap();

    let goals = store.goals_for_user("user-1").await.unwrap();
    assert!(goals[0].completed);
    assert_eq!(goals[1].current_value, 36.0);

    teardown_test_db(pool).await;
  }
}
