//! Reg E classification engine.
//!
//! CORE CRITERIA (all must hold for APPLIES):
//!   1. US consumer       country is "US", or the US-consumer flag is set
//!   2. Card or EFT       card/EFT flag is set
//!   3. Fraud             fraud flag, or reason text mentions fraud / unauthorised
//!   4. Timing            dispute age is known and at most 60 days
//!
//! SOFT SIGNALS (KYC, 3DS, device, AVS, ANI) only add reasons.
//! They never change the verdict.
//!
//! RULES:
//!   - Pure and total. No clock, no I/O, no error paths.
//!   - Records are classified independently; batch order is preserved.

use crate::{
    dispute_age::{days_between, within_policy_window},
    flag::{normalize_flag, MatchSignal},
    kyc::is_kyc_complete,
    notes::{checkout_note, internal_note},
    record::{ClassifiedDispute, DisputeRecord},
    types::AgeDays,
};
use serde::{Deserialize, Serialize};

const FRAUD_KEYWORDS: [&str; 2] = ["fraud", "unauthorised"];
const US_COUNTRY_CODE: &str = "US";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegEStatus {
    /// Meets every core criterion.
    #[serde(alias = "MEETS_REG_E")]
    Applies,
    /// Fails at least one core criterion.
    DoesNotApply,
    /// Reserved. No current rule produces it.
    NeedsReview,
}

impl RegEStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applies => "APPLIES",
            Self::DoesNotApply => "DOES_NOT_APPLY",
            Self::NeedsReview => "NEEDS_REVIEW",
        }
    }

    /// Parses the canonical names and the legacy `MEETS_REG_E`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "APPLIES" | "MEETS_REG_E" => Some(Self::Applies),
            "DOES_NOT_APPLY" => Some(Self::DoesNotApply),
            "NEEDS_REVIEW" => Some(Self::NeedsReview),
            _ => None,
        }
    }
}

/// One explanatory reason. Declaration order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Reason {
    NotUsConsumer,
    NotCardOrEft,
    NotFraudOrUnauthorised,
    OutsideTimeWindow,
    KycIncomplete,
    No3ds,
    DeviceMismatch,
    AvsMismatch,
    AniMismatch,
}

impl Reason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotUsConsumer => "Customer not confirmed as US-based.",
            Self::NotCardOrEft => "Transaction is not marked as card-based or EFT.",
            Self::NotFraudOrUnauthorised => "Dispute is not flagged as fraud/unauthorised.",
            Self::OutsideTimeWindow => "Dispute raised more than 60 days after the transaction.",
            Self::KycIncomplete => "KYC not completed at the time of the dispute.",
            Self::No3ds => "3DS authentication not present or not confirmed.",
            Self::DeviceMismatch => "IP / device does not match the cardholder.",
            Self::AvsMismatch => "AVS check did not match.",
            Self::AniMismatch => "ANI check did not match.",
        }
    }

    /// Core reasons imply DOES_NOT_APPLY. Soft reasons are context only.
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            Self::NotUsConsumer | Self::NotCardOrEft | Self::NotFraudOrUnauthorised | Self::OutsideTimeWindow
        )
    }
}

/// Typed facts derived from one record. All normalization happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub us_consumer: bool,
    pub card_or_eft: bool,
    pub fraud_or_unauthorised: bool,
    pub age_days: Option<AgeDays>,
    pub within_window: bool,
    pub kyc_done: bool,
    pub has_3ds: bool,
    pub device_match: MatchSignal,
    pub avs_match: MatchSignal,
    pub ani_match: MatchSignal,
}

impl Assessment {
    pub fn meets_core_criteria(&self) -> bool {
        self.us_consumer && self.card_or_eft && self.fraud_or_unauthorised && self.within_window
    }

    pub fn status(&self) -> RegEStatus {
        if self.meets_core_criteria() {
            RegEStatus::Applies
        } else {
            RegEStatus::DoesNotApply
        }
    }

    pub fn reasons(&self) -> Vec<Reason> {
        let checks = [
            (!self.us_consumer, Reason::NotUsConsumer),
            (!self.card_or_eft, Reason::NotCardOrEft),
            (!self.fraud_or_unauthorised, Reason::NotFraudOrUnauthorised),
            (!self.within_window, Reason::OutsideTimeWindow),
            (!self.kyc_done, Reason::KycIncomplete),
            (!self.has_3ds, Reason::No3ds),
            (self.device_match.is_mismatch(), Reason::DeviceMismatch),
            (self.avs_match.is_mismatch(), Reason::AvsMismatch),
            (self.ani_match.is_mismatch(), Reason::AniMismatch),
        ];
        checks
            .into_iter()
            .filter_map(|(failed, reason)| failed.then_some(reason))
            .collect()
    }
}

pub fn assess(record: &DisputeRecord) -> Assessment {
    let country = record.country.as_deref().unwrap_or("").trim().to_uppercase();
    let reason_text = record.dispute_reason.as_deref().unwrap_or("").to_lowercase();
    let age_days = days_between(record.transaction_date.as_deref(), record.dispute_date.as_deref());

    Assessment {
        us_consumer: country == US_COUNTRY_CODE || normalize_flag(record.is_us_consumer.as_ref()),
        card_or_eft: normalize_flag(record.is_card_or_eft.as_ref()),
        fraud_or_unauthorised: normalize_flag(record.is_fraud_or_unauthorised.as_ref())
            || FRAUD_KEYWORDS.iter().any(|k| reason_text.contains(k)),
        age_days,
        within_window: within_policy_window(age_days),
        kyc_done: is_kyc_complete(record.kyc_status.as_deref()),
        has_3ds: normalize_flag(record.has_3ds.as_ref()),
        device_match: MatchSignal::from_flag(record.ip_device_match.as_ref()),
        avs_match: MatchSignal::from_flag(record.avs_match.as_ref()),
        ani_match: MatchSignal::from_flag(record.ani_match.as_ref()),
    }
}

pub fn classify_dispute(record: &DisputeRecord) -> ClassifiedDispute {
    let assessment = assess(record);
    let status = assessment.status();
    let reasons = assessment.reasons();
    let internal = internal_note(&assessment, record, status, &reasons);
    let checkout = checkout_note(status).to_string();
    ClassifiedDispute::new(record.clone(), status, &reasons, internal, checkout)
}

pub fn classify_batch(records: &[DisputeRecord]) -> Vec<ClassifiedDispute> {
    records.iter().map(classify_dispute).collect()
}

/// Status counts for one classified batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub applies: usize,
    pub does_not_apply: usize,
    pub needs_review: usize,
}

impl BatchSummary {
    pub fn of(results: &[ClassifiedDispute]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            match r.reg_e_status {
                RegEStatus::Applies => s.applies += 1,
                RegEStatus::DoesNotApply => s.does_not_apply += 1,
                RegEStatus::NeedsReview => s.needs_review += 1,
            }
            s
        })
    }

    pub fn total(&self) -> usize {
        self.applies + self.does_not_apply + self.needs_review
    }
}
