//! First-pass screen over the review text: word lists, personal data
//! patterns and a handful of spam heuristics. Pure and synchronous.

use regex::Regex;
use serde::Serialize;
use serde_json::json;
use std::sync::LazyLock;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::moderation::{
    lexicon::{BLOCKLIST, NEGATIVE_TOKENS, TITLE_TOKENS},
    types::{
        CheckResult, REASON_DEFAMATION, REASON_OFFENSIVE, REASON_PERSONAL_INFO,
        REASON_PUNCTUATION, REASON_REPETITIVE, REASON_SHOUTING, REASON_TOO_SHORT,
    },
};

pub const CHECK_NAME: &str = "local_filter";
pub const CONFIDENCE: f64 = 0.9;

const MIN_CONTENT_LENGTH: usize = 10;
const SHOUTING_MIN_LENGTH: usize = 20;
const MAX_UPPERCASE_RATIO: f64 = 0.7;
const MAX_REPEATED_RUN: usize = 4;
const MAX_PUNCTUATION_RATIO: f64 = 0.3;
const DEFAMATION_MAX_LENGTH: usize = 50;
const MAX_LISTED_TERMS: usize = 3;

// Patterns run against normalized (lowercase, accent-free) text.
static PERSONAL_INFO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // 809-555-1234, 809.555.1234, 809 555 1234, 8095551234
        r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b",
        // (809) 555-1234
        r"\(\d{3}\)\s*\d{3}[-.\s]?\d{4}",
        // +1 809 555 1234
        r"\+\d{1,3}[-.\s]?\d{3}[-.\s]?\d{3}[-.\s]?\d{4}",
        // e-mail
        r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}",
        // street addresses
        r"\b(calle|avenida|av\.)\s+\w+",
        r"\bvive\s+en\s+\w+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Failed to compile personal info regex"))
    .collect()
});

/// Result of the local filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub passed: bool,
    pub reasons: Vec<String>,
    pub matched_terms: Vec<String>,
    /// Matched term count over ten. Not capped, not a probability.
    pub score: f64,
}

impl FilterOutcome {
    pub(crate) fn into_check(self) -> CheckResult {
        CheckResult {
            name: CHECK_NAME,
            confidence: CONFIDENCE,
            passed: self.passed,
            scores: json!({
                "score": self.score,
                "matched_terms": self.matched_terms,
            }),
            reasons: self.reasons,
            flagged: self.matched_terms,
        }
    }
}

/// Lowercases, strips diacritics and trims.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Runs every local check and collects all reasons that apply.
pub fn screen(text: &str) -> FilterOutcome {
    let trimmed = text.trim();
    let normalized = normalize(text);
    let mut reasons = Vec::new();

    let matched_terms = blocklist_matches(&normalized);
    if !matched_terms.is_empty() {
        let listed: Vec<&str> = matched_terms
            .iter()
            .take(MAX_LISTED_TERMS)
            .map(String::as_str)
            .collect();
        reasons.push(format!("{}: {}", REASON_OFFENSIVE, listed.join(", ")));
    }

    if contains_personal_info(&normalized) {
        reasons.push(REASON_PERSONAL_INFO.to_string());
    }

    if is_shouting(trimmed) {
        reasons.push(REASON_SHOUTING.to_string());
    }

    if trimmed.chars().count() < MIN_CONTENT_LENGTH {
        reasons.push(REASON_TOO_SHORT.to_string());
    }

    reasons.extend(heuristic_reasons(trimmed));

    FilterOutcome {
        passed: reasons.is_empty(),
        score: matched_terms.len() as f64 / 10.0,
        reasons,
        matched_terms,
    }
}

/// Repetition, punctuation and defamation checks. Shared with the
/// orchestrator's last pass.
pub(crate) fn heuristic_reasons(text: &str) -> Vec<String> {
    let mut reasons = Vec::new();
    if has_repeated_run(text) {
        reasons.push(REASON_REPETITIVE.to_string());
    }
    if punctuation_ratio(text) > MAX_PUNCTUATION_RATIO {
        reasons.push(REASON_PUNCTUATION.to_string());
    }
    if looks_like_drive_by_defamation(text) {
        reasons.push(REASON_DEFAMATION.to_string());
    }
    reasons
}

fn blocklist_matches(normalized: &str) -> Vec<String> {
    BLOCKLIST
        .iter()
        .filter(|term| normalized.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

fn contains_personal_info(normalized: &str) -> bool {
    PERSONAL_INFO_PATTERNS.iter().any(|re| re.is_match(normalized))
}

fn is_shouting(text: &str) -> bool {
    if text.chars().count() <= SHOUTING_MIN_LENGTH {
        return false;
    }
    let (letters, upper) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(l, u), c| (l + 1, u + c.is_uppercase() as usize));
    letters > 0 && upper as f64 / letters as f64 > MAX_UPPERCASE_RATIO
}

fn has_repeated_run(text: &str) -> bool {
    let mut run = 0;
    let mut previous = None;
    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
            if run > MAX_REPEATED_RUN {
                return true;
            }
        } else {
            previous = Some(c);
            run = 1;
        }
    }
    false
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || matches!(c, '¡' | '¿' | '…' | '«' | '»')
}

fn punctuation_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let marks = text.chars().filter(|c| is_punctuation(*c)).count();
    marks as f64 / total as f64
}

fn looks_like_drive_by_defamation(text: &str) -> bool {
    if text.chars().count() >= DEFAMATION_MAX_LENGTH {
        return false;
    }
    let normalized = normalize(text);
    let words: Vec<&str> = normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has_title = words.iter().any(|w| TITLE_TOKENS.contains(w));
    let has_negative = NEGATIVE_TOKENS.iter().any(|neg| {
        if neg.contains(' ') {
            normalized.contains(neg)
        } else {
            words.contains(neg)
        }
    });
    has_title && has_negative
}
