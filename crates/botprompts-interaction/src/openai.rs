//! OpenAiCompletionClient - REST client for the OpenAI legacy completions
//! endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{CompletionError, CompletionRequest, TextCompletionBackend};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the OpenAI `/v1/completions` API.
#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiCompletionClient {
    /// Creates a new client with the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn send_request(
        &self,
        body: &RawCompletionRequest<'_>,
    ) -> Result<String, CompletionError> {
        tracing::debug!(
            target: "botprompts",
            "Sending completion request (model: {})",
            body.model
        );

        let response = self
            .client
            .post(format!("{}/v1/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| CompletionError::Request(format!("OpenAI API request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: RawCompletionResponse = response.json().await.map_err(|err| {
            CompletionError::Malformed(format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text(parsed)
    }
}

#[async_trait]
impl TextCompletionBackend for OpenAiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = RawCompletionRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            temperature: request.temperature,
            top_p: request.top_p,
            frequency_penalty: request.frequency_penalty,
            max_tokens: request.max_tokens,
        };

        self.send_request(&body).await
    }
}

#[derive(Serialize)]
struct RawCompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    temperature: f64,
    top_p: f64,
    frequency_penalty: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct RawCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text(response: RawCompletionResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.text)
        .ok_or_else(|| CompletionError::Malformed("response carried no completion text".into()))
}

fn map_http_error(status: StatusCode, body: String) -> CompletionError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    CompletionError::Api {
        status: status.as_u16(),
        message,
    }
}
