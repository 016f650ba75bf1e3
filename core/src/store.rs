//! SQLite persistence for the prediction ledger.
//!
//! RULE: Only store.rs talks to the database.
//! The scoring service calls store methods — it never executes SQL.
//!
//! The ledger is append-only: one row per fully-decided scoring result,
//! never updated or deleted. The monotonic rowid gives the single global
//! append order; each append is one atomic INSERT, so no application-level
//! locking is layered on top of SQLite's own.

use crate::error::{ScoreError, ScoreResult};
use crate::policy::Mode;
use crate::types::{LedgerId, RequestId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

/// One scoring decision as persisted in `prediction_log`.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    /// Assigned by the ledger on append; None before the row exists.
    pub id: Option<LedgerId>,
    pub ts_utc: DateTime<Utc>,
    pub request_id: RequestId,
    pub mode: Mode,
    pub threshold: f64,
    pub churn_probability: f64,
    pub churn_flag: i64,
}

/// Per-flag aggregate over a monitoring window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagAggregate {
    pub churn_flag: i64,
    pub count: i64,
    pub avg_probability: f64,
}

/// Aggregates over the `window_size` most recent ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub window_size: i64,
    pub by_flag: Vec<FlagAggregate>,
}

pub struct PredictionStore {
    conn: Connection,
}

impl PredictionStore {
    pub fn open(path: &str) -> ScoreResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ScoreResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn })
    }

    /// Create the ledger schema. Run out-of-band (or by the runner) before
    /// the scoring service starts; the service itself never migrates.
    pub fn migrate(&self) -> ScoreResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_prediction_log.sql"))?;
        Ok(())
    }

    /// Whether the ledger table exists. The scoring service treats a
    /// missing schema as fatal at startup.
    pub fn schema_present(&self) -> ScoreResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table' AND name = 'prediction_log'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Append one decision. One atomic INSERT; returns the assigned id.
    pub fn append_prediction(&self, entry: &LedgerEntry) -> ScoreResult<LedgerId> {
        self.conn
            .execute(
                "INSERT INTO prediction_log
                    (ts_utc, request_id, mode, threshold, churn_probability, churn_flag)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.ts_utc.to_rfc3339(),
                    entry.request_id,
                    entry.mode.as_str(),
                    entry.threshold,
                    entry.churn_probability,
                    entry.churn_flag,
                ],
            )
            .map_err(ScoreError::LedgerWrite)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Group the `limit` most recent entries (by id, descending) by flag.
    /// Pure read; never mutates or removes entries.
    pub fn window_summary(&self, limit: i64) -> ScoreResult<WindowSummary> {
        let mut stmt = self.conn.prepare(
            "SELECT churn_flag, COUNT(*), AVG(churn_probability)
             FROM (SELECT * FROM prediction_log ORDER BY id DESC LIMIT ?1)
             GROUP BY churn_flag
             ORDER BY churn_flag ASC",
        )?;

        let by_flag = stmt
            .query_map(params![limit], |row| {
                Ok(FlagAggregate {
                    churn_flag: row.get(0)?,
                    count: row.get(1)?,
                    avg_probability: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WindowSummary {
            window_size: limit,
            by_flag,
        })
    }

    /// The `limit` most recent entries, newest first. Tooling and tests.
    pub fn recent_predictions(&self, limit: i64) -> ScoreResult<Vec<LedgerEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, ts_utc, request_id, mode, threshold, churn_probability, churn_flag
             FROM prediction_log
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let entries = stmt
            .query_map(params![limit], |row| {
                let ts_raw: String = row.get(1)?;
                let mode_raw: String = row.get(3)?;
                Ok(LedgerEntry {
                    id: Some(row.get(0)?),
                    ts_utc: DateTime::parse_from_rfc3339(&ts_raw)
                        .map(|ts| ts.with_timezone(&Utc))
                        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                    request_id: row.get(2)?,
                    mode: Mode::parse_lossy(&mode_raw),
                    threshold: row.get(4)?,
                    churn_probability: row.get(5)?,
                    churn_flag: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn prediction_count(&self) -> ScoreResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM prediction_log", [], |row| row.get(0))
            .map_err(Into::into)
    }
}
