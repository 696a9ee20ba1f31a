use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::moderation::classifiers::errors::ClassifierError;

const MAX_BODY_SIZE: u64 = 1024 * 1024; // 1MB
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = "CalificaTuProfe-Moderation/0.1";

/// Builds the client shared by both classifiers. `timeout` bounds the whole
/// request; connecting gets at most five seconds of it.
pub fn build_client(timeout: Duration) -> Result<Client, ClassifierError> {
    ClientBuilder::new()
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ClassifierError::ClientBuild(e.to_string()))
}

/// Sends a prepared request and decodes a JSON body. Non-2xx statuses,
/// oversized bodies and undecodable payloads are all errors.
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClassifierError> {
    let response = request
        .send()
        .await
        .map_err(ClassifierError::from_reqwest_error)?;

    // Check content length before downloading
    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(ClassifierError::BodyTooLarge(content_length));
    }

    let status = response.status();
    if !status.is_success() {
        return Err(ClassifierError::Http { status });
    }

    let body = response
        .bytes()
        .await
        .map_err(ClassifierError::from_reqwest_error)?;

    // Content-Length may have been missing
    if body.len() as u64 > MAX_BODY_SIZE {
        return Err(ClassifierError::BodyTooLarge(body.len() as u64));
    }

    Ok(serde_json::from_slice(&body)?)
}
