//! Audit log kept as one pretty-printed JSON array on disk.

use crate::{
    audit::{AuditEntry, AuditLog},
    error::RegeResult,
};
use serde_json::Value;
use std::{fs, path::PathBuf};

pub const DEFAULT_AUDIT_FILE: &str = "data/audit-log.json";

pub struct JsonFileAuditLog {
    path: PathBuf,
}

impl JsonFileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the parent directory and an empty array if the file is missing.
    pub fn ensure_exists(&self) -> RegeResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        if !self.path.exists() {
            fs::write(&self.path, "[]")?;
        }
        Ok(())
    }

    /// Raw stored entries. `None` when the file exists but is not a JSON array.
    fn read_raw(&self) -> RegeResult<Option<Vec<Value>>> {
        if !self.path.exists() {
            return Ok(Some(Vec::new()));
        }
        let raw = fs::read_to_string(&self.path)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Some(Vec::new()));
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(items)) => Ok(Some(items)),
            _ => Ok(None),
        }
    }

    fn quarantine(&self) -> RegeResult<()> {
        let mut aside = self.path.clone().into_os_string();
        aside.push(".corrupt");
        fs::rename(&self.path, &aside)?;
        log::warn!(
            "audit log: {} is not a JSON array, moved to {}",
            self.path.display(),
            PathBuf::from(aside).display()
        );
        Ok(())
    }
}

impl AuditLog for JsonFileAuditLog {
    fn append(&self, entries: &[AuditEntry]) -> RegeResult<()> {
        self.ensure_exists()?;
        let mut combined = match self.read_raw()? {
            Some(existing) => existing,
            None => {
                self.quarantine()?;
                Vec::new()
            }
        };
        for e in entries {
            combined.push(serde_json::to_value(e)?);
        }
        fs::write(&self.path, serde_json::to_string_pretty(&combined)?)?;
        log::debug!("audit log: appended {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn read_all(&self) -> Vec<AuditEntry> {
        let items = match self.read_raw() {
            Ok(Some(items)) => items,
            Ok(None) => {
                log::warn!("audit log: {} is corrupt, reading as empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                log::warn!("audit log: cannot read {}: {e}", self.path.display());
                return Vec::new();
            }
        };
        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value::<AuditEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("audit log: entry {i} in {} skipped: {e}", self.path.display());
                    None
                }
            })
            .collect()
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
