//! KYC completion check.

const KYC_DONE: [&str; 4] = ["passed", "complete", "completed", "verified"];

/// True iff the trimmed, lower-cased status is one of the completion words.
/// Pending, failed, empty and unrecognized text are all "not done".
pub fn is_kyc_complete(status: Option<&str>) -> bool {
    match status {
        Some(s) => {
            let v = s.trim().to_lowercase();
            KYC_DONE.contains(&v.as_str())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_words_count_as_done() {
        for s in ["Passed", " verified ", "COMPLETE", "completed"] {
            assert!(is_kyc_complete(Some(s)), "{s:?} should be done");
        }
    }

    #[test]
    fn other_statuses_are_not_done() {
        for s in ["pending", "failed", "", "   ", "pass", "verified!"] {
            assert!(!is_kyc_complete(Some(s)), "{s:?} should not be done");
        }
        assert!(!is_kyc_complete(None));
    }
}
