//! In-process audit log. Nothing survives the process.

use crate::{
    audit::{AuditEntry, AuditLog},
    error::RegeResult,
};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&self, entries: &[AuditEntry]) -> RegeResult<()> {
        let mut stored = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory audit log lock poisoned"))?;
        stored.extend_from_slice(entries);
        Ok(())
    }

    fn read_all(&self) -> Vec<AuditEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
