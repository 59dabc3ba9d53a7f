//! SQLite-backed audit log.
//!
//! RULE: Only this file talks to the database.

use crate::{
    audit::{AuditEntry, AuditLog},
    classify::RegEStatus,
    error::RegeResult,
    types::BatchId,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::{fs, path::Path};

pub const DEFAULT_SQLITE_FILE: &str = "data/audit-log.db";

pub struct SqliteAuditLog {
    conn: Connection,
    path: Option<String>, // None for :memory:
}

/// One row as stored, before status and timestamp are parsed.
struct StoredRow {
    id: i64,
    arn: Option<String>,
    customer_name: Option<String>,
    reg_e_status: String,
    dispute_reason: Option<String>,
    transaction_date: Option<String>,
    dispute_date: Option<String>,
    created_at: String,
}

impl SqliteAuditLog {
    /// Open (or create) the audit database at `path` and apply migrations.
    pub fn open(path: &str) -> RegeResult<Self> {
        if let Some(dir) = Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let conn = Connection::open(path)?;
        // WAL mode: readers don't block the appender.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        let store = Self {
            conn,
            path: Some(path.to_string()),
        };
        store.migrate()?;
        log::info!("audit log: sqlite store at {path}");
        Ok(store)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RegeResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.migrate()?;
        Ok(store)
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RegeResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_audit_log.sql"))?;
        Ok(())
    }

    /// Number of distinct append calls recorded.
    pub fn batch_count(&self) -> RegeResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(DISTINCT batch_id) FROM audit_entry",
            [],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// Entries written by a single append call, in append order.
    pub fn entries_for_batch(&self, batch_id: &str) -> RegeResult<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, arn, customer_name, reg_e_status, dispute_reason,
                    transaction_date, dispute_date, created_at
             FROM audit_entry WHERE batch_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![batch_id], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().filter_map(into_entry).collect())
    }

    /// Batch ids in the order they were first written.
    pub fn batch_ids(&self) -> RegeResult<Vec<BatchId>> {
        let mut stmt = self.conn.prepare(
            "SELECT batch_id FROM audit_entry GROUP BY batch_id ORDER BY MIN(id) ASC",
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn try_read_all(&self) -> RegeResult<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, arn, customer_name, reg_e_status, dispute_reason,
                    transaction_date, dispute_date, created_at
             FROM audit_entry
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().filter_map(into_entry).collect())
    }
}

impl AuditLog for SqliteAuditLog {
    fn append(&self, entries: &[AuditEntry]) -> RegeResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let batch_id: BatchId = uuid::Uuid::new_v4().to_string();
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO audit_entry (
                    batch_id, arn, customer_name, reg_e_status, dispute_reason,
                    transaction_date, dispute_date, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for e in entries {
                stmt.execute(params![
                    &batch_id,
                    &e.arn,
                    &e.customer_name,
                    e.reg_e_status.as_str(),
                    &e.dispute_reason,
                    &e.transaction_date,
                    &e.dispute_date,
                    e.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("audit log: appended {} entries as batch {batch_id}", entries.len());
        Ok(())
    }

    fn read_all(&self) -> Vec<AuditEntry> {
        match self.try_read_all() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("audit log: cannot read {}: {e}", self.describe());
                Vec::new()
            }
        }
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(p) => format!("sqlite:{p}"),
            None => "sqlite::memory:".to_string(),
        }
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        id: row.get(0)?,
        arn: row.get(1)?,
        customer_name: row.get(2)?,
        reg_e_status: row.get(3)?,
        dispute_reason: row.get(4)?,
        transaction_date: row.get(5)?,
        dispute_date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn into_entry(row: StoredRow) -> Option<AuditEntry> {
    let Some(reg_e_status) = RegEStatus::parse(&row.reg_e_status) else {
        log::warn!("audit log: row {} has unknown status {:?}, skipped", row.id, row.reg_e_status);
        return None;
    };
    let created_at = match DateTime::parse_from_rfc3339(&row.created_at) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            log::warn!("audit log: row {} has bad timestamp: {e}, skipped", row.id);
            return None;
        }
    };
    Some(AuditEntry {
        arn: row.arn,
        customer_name: row.customer_name,
        reg_e_status,
        dispute_reason: row.dispute_reason,
        transaction_date: row.transaction_date,
        dispute_date: row.dispute_date,
        created_at,
    })
}
