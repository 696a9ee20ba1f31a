use califica::config::{ExternalCheck, ModerationConfig};
use std::time::Duration;
use url::Url;
use wiremock::MockServer;

pub const OPENAI_PATH: &str = "/v1/moderations";
pub const PERSPECTIVE_PATH: &str = "/v1alpha1/comments:analyze";

/// Config with both external checks pointed at `server`.
pub fn config_for(server: &MockServer) -> ModerationConfig {
    ModerationConfig {
        openai: ExternalCheck {
            enabled: true,
            api_key: Some("sk-test".to_string()),
            endpoint: Url::parse(&format!("{}{}", server.uri(), OPENAI_PATH)).unwrap(),
        },
        perspective: ExternalCheck {
            enabled: true,
            api_key: Some("pk-test".to_string()),
            endpoint: Url::parse(&format!("{}{}", server.uri(), PERSPECTIVE_PATH)).unwrap(),
        },
        request_timeout: Duration::from_millis(500),
        ..ModerationConfig::default()
    }
}

pub fn openai_body(flagged: bool, scores: &[(&str, f64)]) -> serde_json::Value {
    let category_scores: serde_json::Map<String, serde_json::Value> = scores
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
        .collect();
    let categories: serde_json::Map<String, serde_json::Value> = scores
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::json!(*v > 0.5)))
        .collect();
    serde_json::json!({
        "id": "modr-test",
        "model": "omni-moderation-latest",
        "results": [{
            "flagged": flagged,
            "categories": categories,
            "category_scores": category_scores
        }]
    })
}

pub fn perspective_body(scores: &[(&str, f64)]) -> serde_json::Value {
    let attribute_scores: serde_json::Map<String, serde_json::Value> = scores
        .iter()
        .map(|(k, v)| {
            (
                k.to_string(),
                serde_json::json!({ "summaryScore": { "value": v, "type": "PROBABILITY" } }),
            )
        })
        .collect();
    serde_json::json!({ "attributeScores": attribute_scores, "languages": ["es"] })
}
