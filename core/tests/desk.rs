//! Dispute desk tests — the boundary between callers and the engine.
//!
//! Tests cover: request validation, one audit entry per classified row,
//! a single batch timestamp, and history in append order.

use chrono::{DateTime, TimeZone, Utc};
use rege_core::{
    audit::AuditLog,
    clock::FixedClock,
    desk::{parse_batch, DisputeDesk, ROWS_REQUIRED},
    error::{RegeError, RegeResult},
    store::{JsonFileAuditLog, MemoryAuditLog, SqliteAuditLog},
    RegEStatus,
};
use serde_json::json;

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).single().expect("valid instant")
}

fn build(log: Box<dyn AuditLog>) -> DisputeDesk {
    let _ = env_logger::builder().is_test(true).try_init();
    DisputeDesk::new(log, Box::new(FixedClock(noon())))
}

fn two_rows() -> serde_json::Value {
    json!({
        "rows": [
            {
                "arn": "ARN-1", "customerName": "Jane Smith", "country": "US",
                "isCardOrEFT": true, "disputeReason": "Fraud",
                "transactionDate": "2025-11-01", "disputeDate": "2025-11-20",
                "has3DS": true, "kycStatus": "passed"
            },
            {
                "arn": "ARN-2", "customerName": "Tom Brown", "country": "GB",
                "isUSConsumer": false, "isCardOrEFT": true, "isFraudOrUnauthorised": true,
                "transactionDate": "2025-11-01", "disputeDate": "2025-11-20"
            }
        ]
    })
}

/// Test 1: A batch is classified, summarized and audited once per row.
#[test]
fn classify_records_every_row() -> RegeResult<()> {
    let desk = build(Box::new(MemoryAuditLog::new()));

    let response = desk.classify(&two_rows())?;
    assert_eq!(response.count, 2);
    assert_eq!(response.summary.applies, 1);
    assert_eq!(response.summary.does_not_apply, 1);
    assert_eq!(response.results[0].reg_e_status, RegEStatus::Applies);
    assert_eq!(response.results[1].reg_e_status, RegEStatus::DoesNotApply);
    assert!(response.results[1]
        .reasons
        .contains(&"Customer not confirmed as US-based.".to_string()));

    let history = desk.history();
    assert_eq!(history.count, 2);
    assert_eq!(history.entries[0].arn.as_deref(), Some("ARN-1"));
    assert_eq!(history.entries[1].customer_name.as_deref(), Some("Tom Brown"));
    assert_eq!(history.entries[1].reg_e_status, RegEStatus::DoesNotApply);
    assert!(history.entries.iter().all(|e| e.created_at == noon()));
    Ok(())
}

/// Test 2: Repeated batches append rather than replace.
#[test]
fn repeated_batches_append() -> RegeResult<()> {
    let desk = build(Box::new(SqliteAuditLog::in_memory()?));

    desk.classify(&two_rows())?;
    desk.classify(&two_rows())?;

    let arns: Vec<_> = desk
        .history()
        .entries
        .into_iter()
        .filter_map(|e| e.arn)
        .collect();
    assert_eq!(arns, vec!["ARN-1", "ARN-2", "ARN-1", "ARN-2"]);
    Ok(())
}

/// Test 3: Malformed bodies are rejected before anything is audited.
#[test]
fn malformed_batches_are_rejected() {
    let desk = build(Box::new(MemoryAuditLog::new()));

    for body in [json!(null), json!([]), json!({}), json!({ "rows": {} }), json!({ "rows": "x" })] {
        match desk.classify(&body) {
            Err(RegeError::InvalidBatch { message }) => assert_eq!(message, ROWS_REQUIRED),
            other => panic!("expected InvalidBatch for {body}, got {other:?}"),
        }
    }

    match parse_batch(&json!({ "rows": [{}, 7] })) {
        Err(RegeError::InvalidBatch { message }) => assert!(message.contains("Row 1")),
        other => panic!("expected InvalidBatch, got {other:?}"),
    }

    assert_eq!(desk.history().count, 0);
}

/// Test 4: An empty batch is valid and returns nothing.
#[test]
fn empty_batch_is_valid() -> RegeResult<()> {
    let desk = build(Box::new(MemoryAuditLog::new()));
    let response = desk.classify(&json!({ "rows": [] }))?;
    assert_eq!(response.count, 0);
    assert!(response.results.is_empty());
    assert_eq!(desk.history().count, 0);
    Ok(())
}

/// Test 5: History survives a new desk over the same JSON file.
#[test]
fn json_history_survives_restart() -> RegeResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("audit-log.json");

    build(Box::new(JsonFileAuditLog::new(&path))).classify(&two_rows())?;
    let restarted = build(Box::new(JsonFileAuditLog::new(&path)));

    let history = restarted.history();
    assert_eq!(history.count, 2);
    assert_eq!(history.entries[0].dispute_date.as_deref(), Some("2025-11-20"));
    Ok(())
}

/// Test 6: Status message matches the service banner.
#[test]
fn status_message() {
    let desk = build(Box::new(MemoryAuditLog::new()));
    assert_eq!(desk.status().message, "RegE Radar backend is running.");
}

/// Test 7: A row carrying both canonical and legacy flag names is still classified.
#[test]
fn canonical_and_legacy_keys_together_are_accepted() -> RegeResult<()> {
    let desk = build(Box::new(MemoryAuditLog::new()));
    let body = json!({
        "rows": [{
            "arn": "ARN-3", "country": "US",
            "isCardOrEFT": true, "isCardOrEft": true,
            "isFraudOrUnauthorised": true, "isUnauthorised": false,
            "transactionDate": "2025-11-01", "disputeDate": "2025-11-20"
        }]
    });

    assert_eq!(parse_batch(&body)?.len(), 1);
    let response = desk.classify(&body)?;
    assert_eq!(response.count, 1);
    assert_eq!(response.results[0].reg_e_status, RegEStatus::Applies);
    assert_eq!(desk.history().count, 1);
    Ok(())
}
