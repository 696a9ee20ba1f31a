mod helpers;

use califica::{
    config::ModerationConfig,
    moderation::{MemorySink, ModerationRequest, Moderator},
};
use helpers::{OPENAI_PATH, PERSPECTIVE_PATH, config_for, openai_body, perspective_body};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const POSITIVE: &str = "Este profesor es excelente, explica muy claro y siempre ayuda";

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_clean_text_passes_every_layer() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        OPENAI_PATH,
        ResponseTemplate::new(200).set_body_json(openai_body(false, &[("harassment", 0.02)])),
    )
    .await;
    mount(
        &mock_server,
        PERSPECTIVE_PATH,
        ResponseTemplate::new(200).set_body_json(perspective_body(&[("TOXICITY", 0.04)])),
    )
    .await;

    let moderator = Moderator::from_config(config_for(&mock_server)).unwrap();
    let verdict = moderator.moderate(&ModerationRequest::new(POSITIVE)).await;

    assert!(verdict.allowed);
    assert!(verdict.reasons.is_empty());
    assert_eq!(verdict.confidence, 0.0);
    for check in ["local_filter", "openai_moderation", "perspective", "additional_checks"] {
        assert!(verdict.scores.contains_key(check), "missing scores for {check}");
    }
}

#[tokio::test]
async fn test_external_rejection_merges_in_fixed_order() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        OPENAI_PATH,
        ResponseTemplate::new(200)
            .set_body_json(openai_body(true, &[("harassment", 0.93)]))
            .set_delay(std::time::Duration::from_millis(100)),
    )
    .await;
    mount(
        &mock_server,
        PERSPECTIVE_PATH,
        ResponseTemplate::new(200).set_body_json(perspective_body(&[("TOXICITY", 0.88)])),
    )
    .await;

    let moderator = Moderator::from_config(config_for(&mock_server)).unwrap();
    let verdict = moderator.moderate(&ModerationRequest::new(POSITIVE)).await;

    assert!(!verdict.allowed);
    assert_eq!(
        verdict.reasons,
        vec!["harassment detected", "toxic content detected"]
    );
    assert_eq!(verdict.confidence, 0.85);
}

#[tokio::test]
async fn test_local_and_external_rejection_takes_max_confidence() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        OPENAI_PATH,
        ResponseTemplate::new(200).set_body_json(openai_body(true, &[("harassment", 0.97)])),
    )
    .await;
    mount(&mock_server, PERSPECTIVE_PATH, ResponseTemplate::new(500)).await;

    let moderator = Moderator::from_config(config_for(&mock_server)).unwrap();
    let verdict = moderator
        .moderate(&ModerationRequest::new("Eres un idiota y un estupido sin remedio"))
        .await;

    assert!(!verdict.allowed);
    assert_eq!(verdict.confidence, 0.9);
    assert_eq!(
        verdict.reasons,
        vec![
            "contains offensive language: idiota, estupido",
            "harassment detected"
        ]
    );
    assert_eq!(verdict.flagged_content, vec!["idiota", "estupido"]);
}

#[tokio::test]
async fn test_unavailable_apis_degrade_to_local_result() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, OPENAI_PATH, ResponseTemplate::new(503)).await;
    mount(
        &mock_server,
        PERSPECTIVE_PATH,
        ResponseTemplate::new(200).set_body_string("not json"),
    )
    .await;

    let moderator = Moderator::from_config(config_for(&mock_server)).unwrap();
    let local_only = Moderator::new(ModerationConfig::default());

    for text in [
        POSITIVE,
        "idiota",
        "Llámame al 809-555-1234 para más info",
        "El Dr. es malo",
    ] {
        let request = ModerationRequest::new(text);
        let expected = local_only.moderate(&request).await;
        let verdict = moderator.moderate(&request).await;
        assert_eq!(verdict.allowed, expected.allowed, "{text}");
        assert_eq!(verdict.reasons, expected.reasons, "{text}");
        assert_eq!(verdict.confidence, expected.confidence, "{text}");
        assert!(!verdict.scores.contains_key("openai_moderation"));
        assert!(!verdict.scores.contains_key("perspective"));
    }
}

#[tokio::test]
async fn test_timeout_is_skipped_not_fatal() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        OPENAI_PATH,
        ResponseTemplate::new(200)
            .set_body_json(openai_body(true, &[("hate", 0.99)]))
            .set_delay(std::time::Duration::from_secs(2)),
    )
    .await;
    mount(
        &mock_server,
        PERSPECTIVE_PATH,
        ResponseTemplate::new(200).set_body_json(perspective_body(&[("TOXICITY", 0.01)])),
    )
    .await;

    let moderator = Moderator::from_config(config_for(&mock_server)).unwrap();
    let verdict = moderator.moderate(&ModerationRequest::new(POSITIVE)).await;
    assert!(verdict.allowed);
    assert!(verdict.scores.contains_key("perspective"));
}

#[tokio::test]
async fn test_disabled_external_checks_are_not_called() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.openai.enabled = false;
    config.perspective.api_key = None;

    let moderator = Moderator::from_config(config).unwrap();
    assert_eq!(
        moderator.active_checks(),
        vec!["local_filter", "additional_checks"]
    );
    let verdict = moderator.moderate(&ModerationRequest::new(POSITIVE)).await;
    assert!(verdict.allowed);
}

#[tokio::test]
async fn test_rejection_log_entry_shape() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        OPENAI_PATH,
        ResponseTemplate::new(200).set_body_json(openai_body(true, &[("violence", 0.96)])),
    )
    .await;
    mount(
        &mock_server,
        PERSPECTIVE_PATH,
        ResponseTemplate::new(200).set_body_json(perspective_body(&[("TOXICITY", 0.2)])),
    )
    .await;

    let sink = Arc::new(MemorySink::new());
    let moderator = Moderator::from_config(config_for(&mock_server))
        .unwrap()
        .with_sink(sink.clone());

    let long_text = format!("{} {}", POSITIVE, "La clase de hoy fue larga. ".repeat(20));
    let verdict = moderator
        .moderate(&ModerationRequest::new(long_text).with_submitter("student-7"))
        .await;
    assert!(!verdict.allowed);

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.submitter_id, "student-7");
    assert_eq!(entry.content.chars().count(), 200);
    assert_eq!(entry.reasons, vec!["violent content detected"]);
    assert_eq!(entry.confidence, 0.85);
    assert!(entry.scores.contains_key("openai_moderation"));
    assert!(entry.scores.contains_key("perspective"));
}
