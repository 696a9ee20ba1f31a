pub mod errors;
pub mod http;
pub mod openai;
pub mod perspective;

pub use errors::ClassifierError;
pub use openai::OpenAiModerationClient;
pub use perspective::PerspectiveClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::moderation::types::CheckResult;

/// What an external classifier concluded about one text.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierOutcome {
    pub flagged: bool,
    pub reasons: Vec<String>,
    /// Provider scores kept for the audit log.
    pub scores: Value,
}

/// A third-party check the orchestrator can delegate to.
#[async_trait]
pub trait Classifier: Send + Sync + 'static {
    /// Key under which this check's scores appear in the verdict.
    fn name(&self) -> &'static str;

    /// Confidence assigned to the verdict when this check fails.
    fn confidence(&self) -> f64;

    /// Classify one text. Any error means the check did not run.
    async fn classify(&self, text: &str) -> Result<ClassifierOutcome, ClassifierError>;
}

pub(crate) fn into_check(
    name: &'static str,
    confidence: f64,
    outcome: ClassifierOutcome,
) -> CheckResult {
    CheckResult {
        name,
        confidence,
        passed: !outcome.flagged,
        reasons: outcome.reasons,
        flagged: Vec::new(),
        scores: outcome.scores,
    }
}
