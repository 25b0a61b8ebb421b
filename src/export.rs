//! Backup export/import
//!
//! The export format carries records in their raw + derived form, one array
//! per sport, plus a timestamp. Import treats the raw counters as the only
//! source of truth: derived values in the file are dropped and recomputed,
//! and every record is re-validated before it reaches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::session::{SessionRecord, Sport, SportStats, ValidationError, ALL_SPORTS};
use crate::store::{SeriesStore, StoreError};

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ExportError {
  #[error("malformed export payload: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("record {id} is in the {expected} array but tagged {found}")]
  SportMismatch {
    id: String,
    expected: Sport,
    found: Sport,
  },

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Store(#[from] StoreError),
}

/// ---------------------------------------------------------------------------
/// Export Format
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsExport {
  pub basketball_stats: Vec<serde_json::Value>,
  pub football_stats: Vec<serde_json::Value>,
  pub soccer_stats: Vec<serde_json::Value>,
  pub strength_stats: Vec<serde_json::Value>,
  pub export_date: DateTime<Utc>,
}

impl StatsExport {
  fn bucket(&self, sport: Sport) -> &[serde_json::Value] {
    match sport {
      Sport::Basketball => &self.basketball_stats,
      Sport::Football => &self.football_stats,
      Sport::Soccer => &self.soccer_stats,
      Sport::Strength => &self.strength_stats,
    }
  }
}

/// Serialized record shape accepted on import. Derived metrics in the file
/// deserialize into the stats payload's ignored fields and are recomputed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedRecord {
  id: String,
  user_id: String,
  date: DateTime<Utc>,
  #[serde(default)]
  notes: Option<String>,
  #[serde(flatten)]
  stats: SportStats,
}

/// ---------------------------------------------------------------------------
/// Export / Import
/// ---------------------------------------------------------------------------

/// Snapshot every series for one user into the backup format.
pub async fn export_stats(store: &SeriesStore, user_id: &str) -> Result<StatsExport, ExportError> {
  let serialize_series = |series: &[SessionRecord]| -> Result<Vec<serde_json::Value>, serde_json::Error> {
    series
      .iter()
      .map(|record| serde_json::to_value(record.view()))
      .collect()
  };

  let all = store.query_all(user_id).await?;

  Ok(StatsExport {
    basketball_stats: serialize_series(&all[&Sport::Basketball])?,
    football_stats: serialize_series(&all[&Sport::Football])?,
    soccer_stats: serialize_series(&all[&Sport::Soccer])?,
    strength_stats: serialize_series(&all[&Sport::Strength])?,
    export_date: Utc::now(),
  })
}

/// Restore a backup into the store.
///
/// Every record is deserialized and re-validated before anything is
/// appended, and the batch lands in one transaction, so a malformed file or
/// an id collision fails without touching the store.
pub async fn import_stats(
  store: &SeriesStore,
  export: &StatsExport,
) -> Result<usize, ExportError> {
  let mut records = Vec::new();

  for sport in ALL_SPORTS {
    for value in export.bucket(sport) {
      let imported: ImportedRecord = serde_json::from_value(value.clone())?;
      if imported.stats.sport() != sport {
        return Err(ExportError::SportMismatch {
          id: imported.id,
          expected: sport,
          found: imported.stats.sport(),
        });
      }
      let record = SessionRecord::with_id(
        imported.id,
        imported.user_id,
        imported.date,
        imported.notes,
        imported.stats,
      )?;
      records.push(record);
    }
  }

  // Oldest first so insertion order matches chronology for same-date ties
  records.sort_by_key(|r| r.date);

  let count = store.append_batch(&records).await?;

  tracing::info!(count, "imported backup");
  Ok(count)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
