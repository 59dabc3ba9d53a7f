//! RegE Radar core: Regulation E eligibility classification for
//! consumer payment disputes, plus the append-only audit log it feeds.
//!
//! RULE: `flag`, `kyc`, `dispute_age`, `record`, `classify` and `notes`
//! are pure. They never touch the clock, the filesystem or the audit log.

pub mod audit;
pub mod classify;
pub mod clock;
pub mod config;
pub mod desk;
pub mod dispute_age;
pub mod error;
pub mod flag;
pub mod kyc;
pub mod notes;
pub mod record;
pub mod store;
pub mod types;

pub use classify::{classify_batch, classify_dispute, RegEStatus};
pub use record::{ClassifiedDispute, DisputeRecord};
