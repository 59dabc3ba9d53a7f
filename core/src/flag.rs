//! Boolean and tri-state normalization for loosely-typed flag fields.
//!
//! RULE: This is the only place a raw flag is interpreted.
//! Everything downstream works on `bool` or `MatchSignal`.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

const TRUTHY: [&str; 4] = ["y", "yes", "true", "1"];
const FALSY: [&str; 4] = ["n", "no", "false", "0"];

/// A flag as it arrived on the wire. Deserializing never fails and the
/// original value is serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Number(Number),
    Text(String),
    Other(Value),
}

impl FlagValue {
    /// Definite boolean. Absence of information is always `false`.
    pub fn to_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => is_exactly_one(n),
            Self::Text(s) => TRUTHY.contains(&normalize_text(s).as_str()),
            Self::Other(_) => false,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for FlagValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<Value> for FlagValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            other => Self::Other(other),
        }
    }
}

/// A missing flag normalizes to `false`.
pub fn normalize_flag(flag: Option<&FlagValue>) -> bool {
    flag.map(FlagValue::to_bool).unwrap_or(false)
}

/// Outcome of a device / AVS / ANI check.
///
/// `Unknown` is never a positive match, and it never produces a reason.
///
/// Only a literal `false` ever counted as a mismatch in the web form.
/// Here `0` and the falsy words `n/no/false/0` are mismatches too, so
/// bulk uploads that spell flags as text or digits behave like the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSignal {
    Matched,
    Mismatched,
    Unknown,
}

impl MatchSignal {
    pub fn from_flag(flag: Option<&FlagValue>) -> Self {
        match flag {
            None => Self::Unknown,
            Some(FlagValue::Bool(true)) => Self::Matched,
            Some(FlagValue::Bool(false)) => Self::Mismatched,
            Some(FlagValue::Number(n)) => match n.as_f64() {
                Some(x) if x == 1.0 => Self::Matched,
                Some(x) if x == 0.0 => Self::Mismatched,
                _ => Self::Unknown,
            },
            Some(FlagValue::Text(s)) => {
                let v = normalize_text(s);
                if TRUTHY.contains(&v.as_str()) {
                    Self::Matched
                } else if FALSY.contains(&v.as_str()) {
                    Self::Mismatched
                } else {
                    Self::Unknown
                }
            }
            Some(FlagValue::Other(_)) => Self::Unknown,
        }
    }

    pub fn is_mismatch(self) -> bool {
        self == Self::Mismatched
    }
}

fn is_exactly_one(n: &Number) -> bool {
    n.as_f64() == Some(1.0)
}

fn normalize_text(s: &str) -> String {
    s.trim().to_lowercase()
}
