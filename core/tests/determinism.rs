//! Same record in, byte-identical result out.
//!
//! Classification reads no clock and keeps no state. Only the audit entry
//! carries a timestamp, and it is stamped by the desk, not the engine.

use rege_core::{classify::classify_dispute, record::DisputeRecord};
use serde_json::json;

fn messy_record() -> DisputeRecord {
    DisputeRecord::from_json(&json!({
        "arn": 74_000_123,
        "customerName": "  Sam Lee ",
        "country": " us",
        "isUSConsumer": "Y",
        "isCardOrEFT": 1.0,
        "isFraudOrUnauthorised": "maybe",
        "disputeReason": "Unauthorised transfer",
        "transactionDate": "2025-03-01T18:30:00Z",
        "disputeDate": "2025-04-15",
        "has3DS": null,
        "avsMatch": "n",
        "ipDeviceMatch": {"score": 0.4},
        "kycStatus": "Verified",
        "channel": "web"
    }))
    .expect("record object")
}

#[test]
fn classifying_twice_is_byte_identical() {
    let record = messy_record();

    let a = serde_json::to_string(&classify_dispute(&record)).expect("serialize a");
    let b = serde_json::to_string(&classify_dispute(&record)).expect("serialize b");

    assert_eq!(a, b, "classification diverged:\n  A: {a}\n  B: {b}");
}

#[test]
fn classification_does_not_depend_on_batch_neighbours() {
    let record = messy_record();
    let alone = classify_dispute(&record);

    let neighbours = vec![
        DisputeRecord::from_json(&json!({ "country": "GB" })).expect("record"),
        record.clone(),
        DisputeRecord::default(),
    ];
    let batch = rege_core::classify_batch(&neighbours);

    assert_eq!(batch[1], alone);
}

#[test]
fn messy_record_classifies_as_expected() {
    let result = classify_dispute(&messy_record());

    // 44 days and five and a half hours rounds down to 44.
    assert!(result.internal_note.contains("days between transaction and dispute: 44"));
    assert_eq!(result.reg_e_status, rege_core::RegEStatus::Applies);
    assert_eq!(
        result.reasons,
        vec![
            "3DS authentication not present or not confirmed.",
            "AVS check did not match.",
        ]
    );
}
