//! SQLite turn repository implementation.
//!
//! Implements `TurnRepository` from `chatrelay-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, writes on the
//! single-connection writer pool.

use chatrelay_core::repository::turn::TurnRepository;
use chatrelay_types::error::RepositoryError;
use chatrelay_types::turn::{HistoryOrder, TurnRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TurnRepository`.
pub struct SqliteTurnRepository {
    pool: DatabasePool,
}

impl SqliteTurnRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct TurnRow {
    id: String,
    prompt: String,
    generated_text: String,
    timestamp: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            prompt: row.try_get("prompt")?,
            generated_text: row.try_get("generated_text")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_record(self) -> Result<TurnRecord, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid turn id: {e}")))?;
        let timestamp = parse_datetime(&self.timestamp)?;

        Ok(TurnRecord {
            id,
            prompt: self.prompt,
            generated_text: self.generated_text,
            timestamp,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so that string comparison in SQL is chronological.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn rows_to_records(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<TurnRecord>, RepositoryError> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let turn_row = TurnRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        records.push(turn_row.into_record()?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// TurnRepository implementation
// ---------------------------------------------------------------------------

impl TurnRepository for SqliteTurnRepository {
    async fn append_turn(
        &self,
        prompt: &str,
        generated_text: &str,
    ) -> Result<TurnRecord, RepositoryError> {
        let id = Uuid::now_v7();

        // Clamp to the latest stored timestamp so a clock step backwards
        // cannot reorder the log.
        let row = sqlx::query(
            r#"INSERT INTO turns (id, prompt, generated_text, timestamp)
               SELECT ?, ?, ?, MAX(?, COALESCE((SELECT MAX(timestamp) FROM turns), ''))
               RETURNING timestamp"#,
        )
        .bind(id.to_string())
        .bind(prompt)
        .bind(generated_text)
        .bind(format_datetime(&Utc::now()))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let timestamp: String = row
            .try_get("timestamp")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(TurnRecord {
            id,
            prompt: prompt.to_string(),
            generated_text: generated_text.to_string(),
            timestamp: parse_datetime(&timestamp)?,
        })
    }

    async fn recent_turns(
        &self,
        limit: usize,
        order: HistoryOrder,
    ) -> Result<Vec<TurnRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, prompt, generated_text, timestamp FROM turns ORDER BY timestamp DESC, rowid DESC LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut records = rows_to_records(&rows)?;
        if order == HistoryOrder::Chronological {
            records.reverse();
        }

        Ok(records)
    }

    async fn list_all(&self) -> Result<Vec<TurnRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, prompt, generated_text, timestamp FROM turns ORDER BY timestamp ASC, rowid ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_records(&rows)
    }

    async fn count_turns(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM turns")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}
