//! Client for an OpenAI-compatible `/moderations` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    config::Thresholds,
    moderation::{
        classifiers::{Classifier, ClassifierOutcome, errors::ClassifierError, http::send_json},
        types::{Category, REASON_PROVIDER_FLAGGED, exceeded},
    },
};

pub const CHECK_NAME: &str = "openai_moderation";
pub const CONFIDENCE: f64 = 0.85;

#[derive(Serialize, Clone, Debug)]
struct CreateRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize, Clone, Debug)]
struct CreateResponse {
    results: Vec<ModerationResult>,
}

#[derive(Deserialize, Clone, Debug)]
struct ModerationResult {
    flagged: bool,
    #[serde(default)]
    categories: HashMap<String, bool>,
    #[serde(default)]
    category_scores: HashMap<String, f64>,
}

/// Maps the provider's category names onto ours. Threatening variants all
/// land in `Threat`; unknown names are kept in the audit scores only.
fn map_category(name: &str) -> Option<Category> {
    match name {
        "sexual" | "sexual/minors" => Some(Category::Sexual),
        "hate" => Some(Category::Hate),
        "harassment" => Some(Category::Harassment),
        "hate/threatening" | "harassment/threatening" => Some(Category::Threat),
        "self-harm" | "self-harm/intent" | "self-harm/instructions" => Some(Category::SelfHarm),
        "violence" | "violence/graphic" => Some(Category::Violence),
        _ => None,
    }
}

pub struct OpenAiModerationClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    thresholds: Thresholds,
}

impl OpenAiModerationClient {
    pub fn new(
        http: Client,
        endpoint: Url,
        api_key: impl Into<String>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            http,
            endpoint,
            api_key: api_key.into(),
            thresholds,
        }
    }

    fn evaluate(&self, result: ModerationResult) -> ClassifierOutcome {
        let mut by_category: BTreeMap<Category, f64> = BTreeMap::new();
        for (name, score) in &result.category_scores {
            if let Some(category) = map_category(name) {
                let slot = by_category.entry(category).or_insert(0.0);
                *slot = slot.max(*score);
            }
        }

        let mut hits = exceeded(&by_category, &self.thresholds);
        if result.flagged && hits.is_empty() {
            // Provider flagged without any score over our limits: fall back
            // to its own boolean categories.
            let mut flagged: Vec<Category> = result
                .categories
                .iter()
                .filter(|(_, on)| **on)
                .filter_map(|(name, _)| map_category(name))
                .collect();
            flagged.sort();
            flagged.dedup();
            hits = flagged;
        }

        let mut reasons: Vec<String> = hits.iter().map(|c| c.reason().to_string()).collect();
        if result.flagged && reasons.is_empty() {
            reasons.push(REASON_PROVIDER_FLAGGED.to_string());
        }

        let raw_scores: BTreeMap<&String, &f64> = result.category_scores.iter().collect();
        ClassifierOutcome {
            flagged: !reasons.is_empty(),
            reasons,
            scores: json!({
                "flagged": result.flagged,
                "category_scores": raw_scores,
            }),
        }
    }
}

#[async_trait]
impl Classifier for OpenAiModerationClient {
    fn name(&self) -> &'static str {
        CHECK_NAME
    }

    fn confidence(&self) -> f64 {
        CONFIDENCE
    }

    #[instrument(skip_all, fields(check = CHECK_NAME))]
    async fn classify(&self, text: &str) -> Result<ClassifierOutcome, ClassifierError> {
        let request = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&CreateRequest { input: text });

        let response: CreateResponse = send_json(request).await?;
        let result = response
            .results
            .into_iter()
            .next()
            .ok_or(ClassifierError::MissingField("results"))?;

        debug!(flagged = result.flagged, "moderation response received");
        Ok(self.evaluate(result))
    }
}
