//! Test utilities and helpers
//!
//! Common test infrastructure: in-memory database setup/teardown and
//! seed-data factories.

use std::sync::Once;

use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use crate::models::session::{BasketballStats, SessionRecord, SportStats};
use crate::store::SeriesStore;

static TRACING: Once = Once::new();

/// Route tracing output through the test harness, honoring RUST_LOG.
/// Visible with `--nocapture`.
fn init_tracing() {
  TRACING.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
      .with_test_writer()
      .try_init();
  });
}

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  init_tracing();

  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed `count` basketball sessions for a user, one per day, newest today.
/// Returns the stored records, most recent first.
pub async fn seed_basketball_sessions(
  store: &SeriesStore,
  user_id: &str,
  count: usize,
) -> Vec<SessionRecord> {
  let mut records = Vec::with_capacity(count);
  let now = Utc::now();

  for i in 0..count {
    let record = SessionRecord::new(
      user_id,
      now - Duration::days(i as i64),
      None,
      SportStats::Basketball(BasketballStats {
        points: 18 + (i % 10) as i64,
        field_goals_made: 7 + (i % 3) as i64,
        field_goals_attempted: 16,
        rebounds: 5,
        assists: 3,
        ..Default::default()
      }),
    )
    .expect("seed record must validate");

    store
      .append(&record)
      .await
      .expect("Failed to insert test session");
    records.push(record);
  }

  records
}
