//! Note templates. Each function returns a complete string.

use crate::{
    classify::{Assessment, Reason, RegEStatus},
    record::DisputeRecord,
};

pub const CHECKOUT_NOTE_MEETS: &str = "This dispute meets our internal criteria for Regulation E. \
We are challenging the chargeback accordingly.";

pub const CHECKOUT_NOTE_DOES_NOT_MEET: &str = "This dispute does not meet our internal criteria for \
Regulation E, for example due to country, dispute reason or timing. We are providing this \
information for context and still challenging the chargeback where appropriate.";

const UNKNOWN: &str = "Unknown";

/// Customer-facing evidence note, chosen only by whether the status is APPLIES.
pub fn checkout_note(status: RegEStatus) -> &'static str {
    match status {
        RegEStatus::Applies => CHECKOUT_NOTE_MEETS,
        RegEStatus::DoesNotApply | RegEStatus::NeedsReview => CHECKOUT_NOTE_DOES_NOT_MEET,
    }
}

/// Internal audit note: structured facts, then a reasons sentence when
/// there is anything to explain. Parts are joined with ". ".
pub fn internal_note(
    assessment: &Assessment,
    record: &DisputeRecord,
    status: RegEStatus,
    reasons: &[Reason],
) -> String {
    let mut parts = vec![
        format!("Country: {}", or_unknown(record.country.as_deref())),
        format!("dispute reason: {}", or_unknown(record.dispute_reason.as_deref())),
        format!("fraud/unauthorised: {}", yes_no(assessment.fraud_or_unauthorised)),
        format!("card/EFT: {}", yes_no(assessment.card_or_eft)),
        format!(
            "days between transaction and dispute: {}",
            assessment
                .age_days
                .map(|d| d.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string())
        ),
    ];

    if !reasons.is_empty() {
        let joined = reasons.iter().map(Reason::message).collect::<Vec<_>>().join(" ");
        parts.push(match status {
            RegEStatus::Applies => {
                format!("Case meets internal criteria for Reg E. Additional checks: {joined}")
            }
            RegEStatus::DoesNotApply | RegEStatus::NeedsReview => {
                format!("Case does not meet internal criteria for Reg E. Reasons: {joined}")
            }
        });
    }

    parts.join(". ")
}

fn or_unknown(raw: Option<&str>) -> &str {
    match raw {
        Some(s) if !s.is_empty() => s,
        _ => UNKNOWN,
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}
