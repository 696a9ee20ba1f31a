//! Last-pass safety net run after the external classifiers. It repeats the
//! repetition, punctuation and defamation heuristics of the local filter so
//! they still apply when the local filter is switched off.

use serde_json::json;

use crate::moderation::{filter::heuristic_reasons, types::CheckResult};

pub const CHECK_NAME: &str = "additional_checks";
pub const CONFIDENCE: f64 = 0.7;

pub(crate) fn run(text: &str) -> CheckResult {
    let reasons = heuristic_reasons(text.trim());
    CheckResult {
        name: CHECK_NAME,
        confidence: CONFIDENCE,
        passed: reasons.is_empty(),
        scores: json!({ "failed_checks": reasons.len() }),
        reasons,
        flagged: Vec::new(),
    }
}
