//! Dispute records as they arrive, and as they leave after classification.

use crate::{
    classify::{Reason, RegEStatus},
    flag::FlagValue,
    types::Arn,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One dispute row from the form or a bulk upload.
///
/// Every field is optional and leniently typed: deserializing an object
/// into a `DisputeRecord` never fails. Fields the engine does not know
/// are kept in `extra` and echoed back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisputeRecord {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub arn: Option<Arn>,

    #[serde(
        rename = "customerName",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(rename = "isUSConsumer", default, skip_serializing_if = "Option::is_none")]
    pub is_us_consumer: Option<FlagValue>,

    #[serde(
        rename = "disputeReason",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub dispute_reason: Option<String>,

    #[serde(
        rename = "isFraudOrUnauthorised",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_fraud_or_unauthorised: Option<FlagValue>,

    #[serde(
        rename = "isCardOrEFT",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_card_or_eft: Option<FlagValue>,

    #[serde(
        rename = "transactionDate",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_date: Option<String>,

    #[serde(
        rename = "disputeDate",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub dispute_date: Option<String>,

    #[serde(rename = "has3DS", default, skip_serializing_if = "Option::is_none")]
    pub has_3ds: Option<FlagValue>,

    #[serde(rename = "avsMatch", default, skip_serializing_if = "Option::is_none")]
    pub avs_match: Option<FlagValue>,

    #[serde(rename = "ipDeviceMatch", default, skip_serializing_if = "Option::is_none")]
    pub ip_device_match: Option<FlagValue>,

    #[serde(rename = "aniMatch", default, skip_serializing_if = "Option::is_none")]
    pub ani_match: Option<FlagValue>,

    #[serde(
        rename = "kycStatus",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kyc_status: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Legacy key and the canonical key it stands in for.
const LEGACY_KEYS: [(&str, &str); 2] = [
    ("isUnauthorised", "isFraudOrUnauthorised"),
    ("isCardOrEft", "isCardOrEFT"),
];

impl DisputeRecord {
    /// Build a record from a decoded JSON value.
    /// Returns `None` when the value is not an object.
    ///
    /// A legacy key is read only when its canonical key is absent;
    /// otherwise it stays in `extra` untouched.
    pub fn from_json(value: &Value) -> Option<Self> {
        let mut fields = value.as_object()?.clone();
        for (legacy, canonical) in LEGACY_KEYS {
            if fields.contains_key(canonical) {
                continue;
            }
            if let Some(v) = fields.remove(legacy) {
                fields.insert(canonical.to_string(), v);
            }
        }
        serde_json::from_value(Value::Object(fields)).ok()
    }
}

/// Keys written by the classifier. Input keys with these names are replaced.
pub(crate) const OUTPUT_KEYS: [&str; 4] = ["regEStatus", "reasons", "internalNote", "checkoutNote"];

/// A dispute record plus its Reg E verdict and explanatory text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedDispute {
    #[serde(flatten)]
    pub record: DisputeRecord,
    #[serde(rename = "regEStatus")]
    pub reg_e_status: RegEStatus,
    pub reasons: Vec<String>,
    pub internal_note: String,
    pub checkout_note: String,
}

impl ClassifiedDispute {
    pub(crate) fn new(
        mut record: DisputeRecord,
        reg_e_status: RegEStatus,
        reasons: &[Reason],
        internal_note: String,
        checkout_note: String,
    ) -> Self {
        for key in OUTPUT_KEYS {
            record.extra.remove(key);
        }
        Self {
            record,
            reg_e_status,
            reasons: reasons.iter().map(|r| r.message().to_string()).collect(),
            internal_note,
            checkout_note,
        }
    }
}

/// Accept strings as-is, stringify numbers and booleans, drop anything else.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
