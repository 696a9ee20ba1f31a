mod helpers;

use califica::{
    config::Thresholds,
    moderation::classifiers::{
        Classifier, ClassifierError, OpenAiModerationClient, PerspectiveClient, http::build_client,
    },
};
use helpers::{OPENAI_PATH, PERSPECTIVE_PATH, openai_body, perspective_body};
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

fn openai(server: &MockServer) -> OpenAiModerationClient {
    OpenAiModerationClient::new(
        build_client(Duration::from_millis(500)).unwrap(),
        Url::parse(&format!("{}{}", server.uri(), OPENAI_PATH)).unwrap(),
        "sk-test",
        Thresholds::default(),
    )
}

fn perspective(server: &MockServer) -> PerspectiveClient {
    PerspectiveClient::new(
        build_client(Duration::from_millis(500)).unwrap(),
        Url::parse(&format!("{}{}", server.uri(), PERSPECTIVE_PATH)).unwrap(),
        "pk-test",
        Thresholds::default(),
    )
}

#[tokio::test]
async fn test_openai_sends_bearer_and_input() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({ "input": "hola profe" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_body(false, &[("hate", 0.01)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = openai(&mock_server).classify("hola profe").await.unwrap();
    assert!(!outcome.flagged);
    assert!(outcome.reasons.is_empty());
}

#[tokio::test]
async fn test_openai_flags_hate_and_threats() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_body(
            true,
            &[("hate", 0.95), ("hate/threatening", 0.9), ("sexual", 0.01)],
        )))
        .mount(&mock_server)
        .await;

    let outcome = openai(&mock_server).classify("...").await.unwrap();
    assert!(outcome.flagged);
    assert_eq!(
        outcome.reasons,
        vec!["hate speech detected", "threats detected"]
    );
    assert_eq!(outcome.scores["flagged"], true);
}

#[tokio::test]
async fn test_openai_empty_results_is_missing_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })))
        .mount(&mock_server)
        .await;

    let result = openai(&mock_server).classify("texto").await;
    assert!(matches!(result, Err(ClassifierError::MissingField("results"))));
}

#[tokio::test]
async fn test_openai_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    match openai(&mock_server).classify("texto").await {
        Err(ClassifierError::Http { status }) => assert_eq!(status.as_u16(), 429),
        other => panic!("Expected HTTP 429 error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_perspective_sends_key_and_attributes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PERSPECTIVE_PATH))
        .and(query_param("key", "pk-test"))
        .and(body_partial_json(serde_json::json!({
            "comment": { "text": "buena clase" },
            "languages": ["es"],
            "requestedAttributes": { "TOXICITY": {} }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(perspective_body(&[("TOXICITY", 0.03)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = perspective(&mock_server).classify("buena clase").await.unwrap();
    assert!(!outcome.flagged);
}

#[tokio::test]
async fn test_perspective_flags_toxicity() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PERSPECTIVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(perspective_body(&[
            ("TOXICITY", 0.92),
            ("THREAT", 0.85),
            ("PROFANITY", 0.99),
        ])))
        .mount(&mock_server)
        .await;

    let outcome = perspective(&mock_server).classify("...").await.unwrap();
    assert!(outcome.flagged);
    assert_eq!(
        outcome.reasons,
        vec!["toxic content detected", "threats detected"]
    );
}

#[tokio::test]
async fn test_perspective_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PERSPECTIVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let result = perspective(&mock_server).classify("texto").await;
    assert!(matches!(result, Err(ClassifierError::Malformed(_))));
}

#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PERSPECTIVE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(perspective_body(&[("TOXICITY", 0.1)]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let result = perspective(&mock_server).classify("texto").await;
    assert!(matches!(result, Err(ClassifierError::RequestTimeout)));
}

#[tokio::test]
async fn test_connection_refused() {
    let client = OpenAiModerationClient::new(
        build_client(Duration::from_millis(500)).unwrap(),
        Url::parse("http://127.0.0.1:9/v1/moderations").unwrap(),
        "sk-test",
        Thresholds::default(),
    );
    let result = client.classify("texto").await;
    assert!(result.is_err());
}
