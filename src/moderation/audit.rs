//! Rejection log. Entries are a side effect of moderation and never change
//! the verdict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{error, warn};

use crate::moderation::types::{ModerationRequest, ModerationVerdict};

pub const MAX_LOGGED_CHARS: usize = 200;
const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub submitter_id: String,
    /// At most `MAX_LOGGED_CHARS` characters of the submitted text.
    pub content: String,
    pub reasons: Vec<String>,
    pub confidence: f64,
    pub scores: BTreeMap<String, Value>,
}

impl RejectionLogEntry {
    pub fn new(request: &ModerationRequest, verdict: &ModerationVerdict) -> Self {
        Self {
            timestamp: Utc::now(),
            submitter_id: request.submitter_id().unwrap_or(ANONYMOUS).to_string(),
            content: request.text().chars().take(MAX_LOGGED_CHARS).collect(),
            reasons: verdict.reasons.clone(),
            confidence: verdict.confidence,
            scores: verdict.scores.clone(),
        }
    }
}

/// Destination for rejection entries.
pub trait RejectionSink: Send + Sync {
    fn record(&self, entry: &RejectionLogEntry);
}

/// Emits each entry as a structured `warn` event on the
/// `moderation::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl RejectionSink for TracingSink {
    fn record(&self, entry: &RejectionLogEntry) {
        match serde_json::to_string(entry) {
            Ok(json) => warn!(
                target: "moderation::audit",
                submitter_id = %entry.submitter_id,
                confidence = entry.confidence,
                entry = %json,
                "content rejected"
            ),
            Err(e) => error!(target: "moderation::audit", "failed to serialize rejection entry: {}", e),
        }
    }
}

/// Keeps entries in memory. Useful in tests and when embedding the
/// moderator somewhere that ships logs itself.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<RejectionLogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<RejectionLogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RejectionSink for MemorySink {
    fn record(&self, entry: &RejectionLogEntry) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry.clone()),
            Err(poisoned) => poisoned.into_inner().push(entry.clone()),
        }
    }
}
