//! The dispute desk: the boundary between callers and the engine.
//!
//! FLOW (one classify call):
//!   1. Validate the request body shape
//!   2. Classify every row independently, preserving order
//!   3. Stamp one audit entry per result with a single batch timestamp
//!   4. Append the batch to the audit log, once
//!   5. Return the full classified rows

use crate::{
    audit::{AuditEntry, AuditLog},
    classify::{classify_batch, BatchSummary},
    clock::AuditClock,
    error::{RegeError, RegeResult},
    record::{ClassifiedDispute, DisputeRecord},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_MESSAGE: &str = "RegE Radar backend is running.";
pub const ROWS_REQUIRED: &str = "Request body must have a \"rows\" array.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub count: usize,
    pub summary: BatchSummary,
    pub results: Vec<ClassifiedDispute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub entries: Vec<AuditEntry>,
}

/// Check the request shape and decode its rows.
/// The body must be an object whose `rows` is an array of objects.
pub fn parse_batch(body: &Value) -> RegeResult<Vec<DisputeRecord>> {
    let rows = body
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| RegeError::invalid_batch(ROWS_REQUIRED))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            DisputeRecord::from_json(row).ok_or_else(|| {
                RegeError::invalid_batch(format!("Row {i} is not a dispute record object."))
            })
        })
        .collect()
}

pub struct DisputeDesk {
    audit_log: Box<dyn AuditLog>,
    clock: Box<dyn AuditClock>,
}

impl DisputeDesk {
    pub fn new(audit_log: Box<dyn AuditLog>, clock: Box<dyn AuditClock>) -> Self {
        Self { audit_log, clock }
    }

    pub fn status(&self) -> StatusMessage {
        StatusMessage {
            message: STATUS_MESSAGE.to_string(),
        }
    }

    /// Classify a request body and record the batch in the audit log.
    pub fn classify(&self, body: &Value) -> RegeResult<ClassifyResponse> {
        let records = parse_batch(body)?;
        self.classify_records(&records)
    }

    pub fn classify_records(&self, records: &[DisputeRecord]) -> RegeResult<ClassifyResponse> {
        let results = classify_batch(records);
        let summary = BatchSummary::of(&results);

        let created_at = self.clock.now();
        let entries: Vec<AuditEntry> = results
            .iter()
            .map(|r| AuditEntry::from_classified(r, created_at))
            .collect();
        self.audit_log.append(&entries)?;

        log::debug!(
            "classified {} disputes: {} applies, {} does not apply",
            summary.total(),
            summary.applies,
            summary.does_not_apply
        );

        Ok(ClassifyResponse {
            count: results.len(),
            summary,
            results,
        })
    }

    pub fn history(&self) -> HistoryResponse {
        let entries = self.audit_log.read_all();
        HistoryResponse {
            count: entries.len(),
            entries,
        }
    }
}
