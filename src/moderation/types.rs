//! Shared moderation data: requests, verdicts, categories and reason strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::Thresholds;

pub const REASON_OFFENSIVE: &str = "contains offensive language";
pub const REASON_PERSONAL_INFO: &str = "contains personal information";
pub const REASON_SHOUTING: &str = "excessive capitalization";
pub const REASON_TOO_SHORT: &str = "content too short";
pub const REASON_REPETITIVE: &str = "repetitive characters (spam)";
pub const REASON_PUNCTUATION: &str = "excessive punctuation";
pub const REASON_DEFAMATION: &str = "possible defamation without context";
pub const REASON_PROVIDER_FLAGGED: &str = "flagged by external moderation service";

/// Text submitted for moderation, plus who sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationRequest {
    text: String,
    submitter_id: Option<String>,
}

impl ModerationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            submitter_id: None,
        }
    }

    pub fn with_submitter(mut self, submitter_id: impl Into<String>) -> Self {
        self.submitter_id = Some(submitter_id.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn submitter_id(&self) -> Option<&str> {
        self.submitter_id.as_deref()
    }
}

/// Aggregated result of one moderation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub allowed: bool,
    /// Human-readable reasons in the order the checks ran.
    pub reasons: Vec<String>,
    /// Raw per-check data keyed by check name. Never shown to submitters.
    pub scores: BTreeMap<String, Value>,
    /// Certainty of the verdict, the maximum over failing checks.
    pub confidence: f64,
    /// Blocklist terms found in the text.
    pub flagged_content: Vec<String>,
}

impl ModerationVerdict {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reasons: Vec::new(),
            scores: BTreeMap::new(),
            confidence: 0.0,
            flagged_content: Vec::new(),
        }
    }

    /// Folds one check's result into the verdict. Duplicate reason strings
    /// (the additional pass repeats some local checks) are kept once.
    pub(crate) fn merge(&mut self, check: CheckResult) {
        self.scores.insert(check.name.to_string(), check.scores);
        if check.passed {
            return;
        }
        self.allowed = false;
        self.confidence = self.confidence.max(check.confidence);
        for reason in check.reasons {
            if !self.reasons.contains(&reason) {
                self.reasons.push(reason);
            }
        }
        for term in check.flagged {
            if !self.flagged_content.contains(&term) {
                self.flagged_content.push(term);
            }
        }
    }
}

/// Outcome of a single check, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CheckResult {
    pub name: &'static str,
    pub confidence: f64,
    pub passed: bool,
    pub reasons: Vec<String>,
    pub flagged: Vec<String>,
    pub scores: Value,
}

/// The crate's own harm vocabulary. Provider-specific category names are
/// translated into this at the client boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Toxicity,
    SevereToxicity,
    Hate,
    Harassment,
    Insult,
    Threat,
    Violence,
    SelfHarm,
    Sexual,
    Profanity,
}

impl Category {
    pub fn reason(self) -> &'static str {
        match self {
            Category::Toxicity => "toxic content detected",
            Category::SevereToxicity => "severely toxic content detected",
            Category::Hate => "hate speech detected",
            Category::Harassment => "harassment detected",
            Category::Insult => "insults detected",
            Category::Threat => "threats detected",
            Category::Violence => "violent content detected",
            Category::SelfHarm => "self-harm content detected",
            Category::Sexual => "sexual content detected",
            Category::Profanity => "profanity detected",
        }
    }

    /// Configured limit for this category, or `None` when scores in it are
    /// recorded but never acted on.
    pub fn threshold(self, thresholds: &Thresholds) -> Option<f64> {
        match self {
            Category::Toxicity | Category::SevereToxicity => Some(thresholds.toxicity),
            Category::Hate => Some(thresholds.hate),
            Category::Harassment | Category::Insult => Some(thresholds.harassment),
            Category::Threat | Category::Violence | Category::SelfHarm => {
                Some(thresholds.violence)
            }
            Category::Sexual => Some(thresholds.sexual),
            Category::Profanity => None,
        }
    }
}

/// Reasons for every category whose score is strictly above its threshold,
/// in `Category` order.
pub(crate) fn exceeded(
    scores: &BTreeMap<Category, f64>,
    thresholds: &Thresholds,
) -> Vec<Category> {
    scores
        .iter()
        .filter(|(category, score)| {
            category
                .threshold(thresholds)
                .is_some_and(|limit| **score > limit)
        })
        .map(|(category, _)| *category)
        .collect()
}
