//! athlete-log: multi-sport stat tracking core
//!
//! Ingests raw per-session counters (shooting splits, yards, tackles,
//! sets x reps x weight), computes derived ratios, keeps per-user
//! per-sport history, and classifies trends for the progress views and
//! the AI feedback/goal generators.
//!
//! Layering:
//! - `metrics` / `aggregate`: pure, synchronous math
//! - `models`: validated session records and goal records
//! - `store` / `db`: the sqlx persistence boundary
//! - `llm` / `feedback` / `goals`: the text-generation boundary
//! - `export`: backup round-trip

pub mod aggregate;
pub mod db;
pub mod export;
pub mod feedback;
pub mod goals;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod store;

#[cfg(test)]
pub mod test_utils;

pub use aggregate::Trend;
pub use models::{Goal, NewGoal, SessionRecord, Sport, SportStats, ValidationError};
pub use store::SeriesStore;

/// ---------------------------------------------------------------------------
/// End-to-End Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::session::BasketballStats;
  use crate::test_utils::*;
  use chrono::{Duration, TimeZone, Utc};
  use serial_test::serial;

  #[tokio::test]
  #[serial]
  async fn test_log_two_games_and_read_back_summaries() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());

    let d1 = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
    let d2 = d1 + Duration::days(2);

    let game1 = SessionRecord::new(
      "user-1",
      d1,
      None,
      SportStats::Basketball(BasketballStats {
        points: 25,
        field_goals_made: 10,
        field_goals_attempted: 20,
        ..Default::default()
      }),
    )
    .unwrap();
    let game2 = SessionRecord::new(
      "user-1",
      d2,
      None,
      SportStats::Basketball(BasketballStats {
        points: 28,
        field_goals_made: 12,
        field_goals_attempted: 20,
        ..Default::default()
      }),
    )
    .unwrap();

    store.append(&game1).await.unwrap();
    store.append(&game2).await.unwrap();

    let series = store.query("user-1", Sport::Basketball, None).await.unwrap();
    assert_eq!(series[0].id, game2.id);
    assert_eq!(series[1].id, game1.id);

    assert_eq!(aggregate::latest(&series, "derived.fieldGoalPct"), 60.0);
    assert_eq!(aggregate::average(&series, "points", None), 26.5);
    assert_eq!(aggregate::trend(&series, "points"), Trend::Flat);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_seeded_history_feeds_overview() {
    let pool = setup_test_db().await;
    let store = SeriesStore::new(pool.clone());
    seed_basketball_sessions(&store, "user-1", 12).await;

    let series = store
      .query("user-1", Sport::Basketball, Some(10))
      .await
      .unwrap();
    assert_eq!(series.len(), 10);

    let summary = aggregate::summary(&series, "points");
    assert!(summary.latest >= 18.0);
    assert!(summary.average > 0.0);

    teardown_test_db(pool).await;
  }
}
