use futures::FutureExt;
use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, Span, debug, error, info, instrument, warn};

use crate::{
    config::ModerationConfig,
    moderation::{
        additional,
        audit::{RejectionLogEntry, RejectionSink, TracingSink},
        classifiers::{
            Classifier, ClassifierError, OpenAiModerationClient, PerspectiveClient, http,
            into_check,
        },
        filter,
        types::{CheckResult, ModerationRequest, ModerationVerdict},
    },
};

/// Confidence reported when the pipeline had to fall back to the local
/// filter alone.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

#[derive(Error, Debug)]
enum ModerationError {
    #[error("classifier task failed: {0}")]
    TaskFailed(#[from] JoinError),

    #[error("evaluation panicked: {0}")]
    Panicked(String),
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs every enabled check for a submission and aggregates one verdict.
///
/// The moderator holds no per-call state; one instance is shared by all
/// request handlers.
pub struct Moderator {
    config: ModerationConfig,
    primary: Option<Arc<dyn Classifier>>,
    secondary: Option<Arc<dyn Classifier>>,
    sink: Arc<dyn RejectionSink>,
}

impl Moderator {
    /// A moderator with no external classifiers, whatever the config says
    /// about them.
    pub fn new(config: ModerationConfig) -> Self {
        Self {
            config,
            primary: None,
            secondary: None,
            sink: Arc::new(TracingSink),
        }
    }

    /// Builds the external clients the config enables and has keys for.
    pub fn from_config(config: ModerationConfig) -> Result<Self, ClassifierError> {
        let mut moderator = Self::new(config.clone());
        if config.openai.active_key().is_none() && config.perspective.active_key().is_none() {
            return Ok(moderator);
        }

        let client = http::build_client(config.request_timeout)?;
        if let Some(key) = config.openai.active_key() {
            moderator.primary = Some(Arc::new(OpenAiModerationClient::new(
                client.clone(),
                config.openai.endpoint.clone(),
                key,
                config.thresholds,
            )));
        }
        if let Some(key) = config.perspective.active_key() {
            moderator.secondary = Some(Arc::new(PerspectiveClient::new(
                client,
                config.perspective.endpoint.clone(),
                key,
                config.thresholds,
            )));
        }
        Ok(moderator)
    }

    /// Replaces the first external check.
    pub fn with_primary(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.primary = Some(classifier);
        self
    }

    /// Replaces the second external check.
    pub fn with_secondary(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.secondary = Some(classifier);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn RejectionSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Names of the checks a call will run, in execution order.
    pub fn active_checks(&self) -> Vec<&'static str> {
        let mut checks = Vec::new();
        if self.config.local_filter {
            checks.push(filter::CHECK_NAME);
        }
        checks.extend(self.primary.iter().map(|c| c.name()));
        checks.extend(self.secondary.iter().map(|c| c.name()));
        checks.push(additional::CHECK_NAME);
        checks
    }

    /// Moderates one submission. Always returns a verdict.
    #[instrument(skip_all, fields(submitter = request.submitter_id().unwrap_or("anonymous")))]
    pub async fn moderate(&self, request: &ModerationRequest) -> ModerationVerdict {
        let outcome = AssertUnwindSafe(self.evaluate(request))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ModerationError::Panicked(panic_message(&*payload))));
        let verdict = match outcome {
            Ok(verdict) => verdict,
            Err(e) => {
                error!("moderation pipeline failed, falling back to local filter: {}", e);
                self.fallback(request)
            }
        };

        if verdict.allowed {
            debug!("content allowed");
        } else {
            info!(
                reasons = ?verdict.reasons,
                confidence = verdict.confidence,
                "content rejected"
            );
            if self.config.log_rejections {
                self.record_rejection(request, &verdict);
            }
        }
        verdict
    }

    async fn evaluate(&self, request: &ModerationRequest) -> Result<ModerationVerdict, ModerationError> {
        let text = request.text();
        let mut verdict = ModerationVerdict::allowed();

        if self.config.local_filter {
            verdict.merge(filter::screen(text).into_check());
        }

        // Both external calls are in flight together and both are awaited
        // before either result is used; merge order is fixed.
        let (primary, secondary) = tokio::join!(
            join_check(spawn_check(self.primary.as_ref(), text)),
            join_check(spawn_check(self.secondary.as_ref(), text)),
        );
        for check in [primary?, secondary?].into_iter().flatten() {
            verdict.merge(check);
        }

        verdict.merge(additional::run(text));
        Ok(verdict)
    }

    /// A failing sink is logged and otherwise ignored.
    fn record_rejection(&self, request: &ModerationRequest, verdict: &ModerationVerdict) {
        let entry = RejectionLogEntry::new(request, verdict);
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| self.sink.record(&entry))) {
            error!("rejection sink panicked: {}", panic_message(&*payload));
        }
    }

    fn fallback(&self, request: &ModerationRequest) -> ModerationVerdict {
        let mut verdict = ModerationVerdict::allowed();
        verdict.merge(filter::screen(request.text()).into_check());
        verdict.confidence = FALLBACK_CONFIDENCE;
        verdict
    }
}

fn spawn_check(
    classifier: Option<&Arc<dyn Classifier>>,
    text: &str,
) -> Option<JoinHandle<Option<CheckResult>>> {
    let classifier = Arc::clone(classifier?);
    let text = text.to_owned();
    let task = async move {
        match classifier.classify(&text).await {
            Ok(outcome) => Some(into_check(
                classifier.name(),
                classifier.confidence(),
                outcome,
            )),
            Err(e) => {
                warn!(
                    check = classifier.name(),
                    "external moderation check failed, skipping: {}", e
                );
                None
            }
        }
    };
    Some(tokio::spawn(task.instrument(Span::current())))
}

async fn join_check(
    handle: Option<JoinHandle<Option<CheckResult>>>,
) -> Result<Option<CheckResult>, JoinError> {
    match handle {
        Some(handle) => handle.await,
        None => Ok(None),
    }
}
