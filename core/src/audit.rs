//! Audit log contract.
//!
//! RULE: Append-only. Entries are never mutated or deleted.
//! The classification engine never depends on this module.

use crate::{classify::RegEStatus, error::RegeResult, record::ClassifiedDispute, types::Arn};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one classified dispute, stamped when it was processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    #[serde(default)]
    pub arn: Option<Arn>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(rename = "regEStatus")]
    pub reg_e_status: RegEStatus,
    #[serde(default)]
    pub dispute_reason: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub dispute_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn from_classified(result: &ClassifiedDispute, created_at: DateTime<Utc>) -> Self {
        let record = &result.record;
        Self {
            arn: record.arn.clone(),
            customer_name: record.customer_name.clone(),
            reg_e_status: result.reg_e_status,
            dispute_reason: record.dispute_reason.clone(),
            transaction_date: record.transaction_date.clone(),
            dispute_date: record.dispute_date.clone(),
            created_at,
        }
    }
}

/// Durable, append-only store of audit entries.
pub trait AuditLog: Send {
    /// Append entries after any already stored. Repeated calls append
    /// again; there is no deduplication.
    fn append(&self, entries: &[AuditEntry]) -> RegeResult<()>;

    /// Every stored entry in append order. A missing or unreadable store
    /// reads as empty.
    fn read_all(&self) -> Vec<AuditEntry>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}
