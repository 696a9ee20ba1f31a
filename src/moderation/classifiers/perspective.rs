//! Client for a Perspective-style `comments:analyze` toxicity endpoint.

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
        types::{Category, exceeded},
    },
};

pub const CHECK_NAME: &str = "perspective";
pub const CONFIDENCE: f64 = 0.8;

const LANGUAGE: &str = "es";

/// Attribute names requested from the provider, with the category each one
/// maps to.
const ATTRIBUTES: &[(&str, Category)] = &[
    ("TOXICITY", Category::Toxicity),
    ("SEVERE_TOXICITY", Category::SevereToxicity),
    ("IDENTITY_ATTACK", Category::Hate),
    ("INSULT", Category::Insult),
    ("PROFANITY", Category::Profanity),
    ("THREAT", Category::Threat),
];

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    comment: Comment<'a>,
    languages: [&'a str; 1],
    requested_attributes: BTreeMap<&'static str, EmptyObject>,
    do_not_store: bool,
}

#[derive(Serialize, Debug)]
struct Comment<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
struct EmptyObject {}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    #[serde(default)]
    attribute_scores: HashMap<String, AttributeScore>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AttributeScore {
    summary_score: SummaryScore,
}

#[derive(Deserialize, Debug)]
struct SummaryScore {
    value: f64,
}

/// Validated scores in our vocabulary. Toxicity is always present.
#[derive(Debug, Clone, PartialEq)]
struct ToxicityScores {
    by_category: BTreeMap<Category, f64>,
}

impl TryFrom<AnalyzeResponse> for ToxicityScores {
    type Error = ClassifierError;

    fn try_from(response: AnalyzeResponse) -> Result<Self, Self::Error> {
        let mut by_category = BTreeMap::new();
        for (attribute, category) in ATTRIBUTES {
            if let Some(score) = response.attribute_scores.get(*attribute) {
                let value = score.summary_score.value;
                if !(0.0..=1.0).contains(&value) {
                    return Err(ClassifierError::Malformed(format!(
                        "{} score {} is outside [0, 1]",
                        attribute, value
                    )));
                }
                by_category.insert(*category, value);
            }
        }
        if !by_category.contains_key(&Category::Toxicity) {
            return Err(ClassifierError::MissingField("attributeScores.TOXICITY"));
        }
        Ok(Self { by_category })
    }
}

pub struct PerspectiveClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    thresholds: Thresholds,
}

impl PerspectiveClient {
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

    fn evaluate(&self, scores: ToxicityScores) -> ClassifierOutcome {
        let reasons: Vec<String> = exceeded(&scores.by_category, &self.thresholds)
            .iter()
            .map(|c| c.reason().to_string())
            .collect();
        ClassifierOutcome {
            flagged: !reasons.is_empty(),
            reasons,
            scores: json!(scores.by_category),
        }
    }
}

#[async_trait]
impl Classifier for PerspectiveClient {
    fn name(&self) -> &'static str {
        CHECK_NAME
    }

    fn confidence(&self) -> f64 {
        CONFIDENCE
    }

    #[instrument(skip_all, fields(check = CHECK_NAME))]
    async fn classify(&self, text: &str) -> Result<ClassifierOutcome, ClassifierError> {
        let body = AnalyzeRequest {
            comment: Comment { text },
            languages: [LANGUAGE],
            requested_attributes: ATTRIBUTES
                .iter()
                .map(|(attribute, _)| (*attribute, EmptyObject {}))
                .collect(),
            do_not_store: true,
        };
        let request = self
            .http
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&body);

        let response: AnalyzeResponse = send_json(request).await?;
        let scores = ToxicityScores::try_from(response)?;

        debug!(
            toxicity = scores.by_category.get(&Category::Toxicity).copied(),
            "toxicity response received"
        );
        Ok(self.evaluate(scores))
    }
}
