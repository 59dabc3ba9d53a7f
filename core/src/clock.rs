//! Wall clock for audit timestamps.
//!
//! RULE: Only the boundary layer reads a clock.
//! Classification never does; results carry no timestamp.

use chrono::{DateTime, Utc};

pub trait AuditClock: Send {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl AuditClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant. Used in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl AuditClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
