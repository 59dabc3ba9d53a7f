//! Audit log backends.
//!
//! RULE: Callers hold a `Box<dyn AuditLog>`.
//! Backend choice lives in configuration, nowhere else.

mod json_file;
mod memory;
mod sqlite;

pub use json_file::{JsonFileAuditLog, DEFAULT_AUDIT_FILE};
pub use memory::MemoryAuditLog;
pub use sqlite::{SqliteAuditLog, DEFAULT_SQLITE_FILE};

use crate::{
    audit::AuditLog,
    config::{StoreBackend, StoreConfig},
    error::RegeResult,
};

/// Open the configured backend.
pub fn open_audit_log(config: &StoreConfig) -> RegeResult<Box<dyn AuditLog>> {
    let path = config.resolved_path();
    let audit_log: Box<dyn AuditLog> = match config.backend {
        StoreBackend::Json => {
            let store = JsonFileAuditLog::new(&path);
            store.ensure_exists()?;
            Box::new(store)
        }
        StoreBackend::Sqlite => Box::new(SqliteAuditLog::open(&path)?),
        StoreBackend::Memory => Box::new(MemoryAuditLog::new()),
    };
    log::info!("audit log: using {}", audit_log.describe());
    Ok(audit_log)
}
