//! Shared primitive types used across the engine and the audit log.

/// Acquirer Reference Number. Opaque to the engine.
pub type Arn = String;

/// Identifier shared by every audit row written in one append call.
pub type BatchId = String;

/// Signed whole-day difference between transaction and dispute.
pub type AgeDays = i64;

pub const MS_PER_DAY: i64 = 1000 * 60 * 60 * 24;
