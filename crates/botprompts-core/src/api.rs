//! HTTP client for the prompt catalog API.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::{BotPromptsError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin GET-only client for the prompt catalog.
///
/// All failure modes (transport errors, non-200 statuses, undecodable
/// bodies) are converted into [`BotPromptsError`] variants at this boundary.
/// A single attempt per call, no retries.
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Creates a client with its own connection pool.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Issues a GET against a fully-formed URL and parses the body as JSON.
    ///
    /// Returns the parsed value on HTTP 200; any other status carries the
    /// raw response body in the error.
    pub async fn get(&self, url: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .header("Accept", "*/*")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| BotPromptsError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| BotPromptsError::transport(err.to_string()))?;

        if status != StatusCode::OK {
            tracing::error!(target: "botprompts", "Error in making call: {}", body);
            return Err(BotPromptsError::status(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|err| {
            tracing::error!(target: "botprompts", "Error trying to decode data: {}", err);
            BotPromptsError::malformed(err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_parses_json_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/prompts/commands"))
            .and(header("Content-Type", "application/json"))
            .and(header("Accept", "*/*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"commands": ["a"]})))
            .mount(&server)
            .await;

        let client = ApiClient::new();
        let value = client
            .get(&format!("{}/api/v1/prompts/commands", server.uri()))
            .await
            .unwrap();

        assert_eq!(value, json!({"commands": ["a"]}));
    }

    #[tokio::test]
    async fn test_get_returns_body_on_non_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("prompt not found"))
            .mount(&server)
            .await;

        let client = ApiClient::new();
        let err = client.get(&server.uri()).await.unwrap_err();

        assert!(err.is_status());
        assert_eq!(err.detail(), "prompt not found");
    }

    #[tokio::test]
    async fn test_get_flags_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = ApiClient::new();
        let err = client.get(&server.uri()).await.unwrap_err();

        assert!(matches!(err, BotPromptsError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_get_contains_transport_errors() {
        // Grab a port that nothing is listening on once the server drops
        let server = MockServer::builder().start().await;
        let dead_uri = server.uri();
        drop(server);

        let client = ApiClient::new();
        let err = client.get(&dead_uri).await.unwrap_err();

        assert!(err.is_transport());
    }
}
