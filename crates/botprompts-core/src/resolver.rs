//! On-demand prompt text resolution.

use serde::Deserialize;

use crate::api::ApiClient;
use crate::error::{BotPromptsError, Result};

#[derive(Debug, Deserialize)]
struct PromptDetailResponse {
    revision: PromptRevision,
}

#[derive(Debug, Deserialize)]
struct PromptRevision {
    prompt_text: String,
}

/// Fetches the full prompt text for a command.
///
/// No caching: resolution only happens on an actual command match, which is
/// rare relative to the refresh cadence, so every call goes to the network.
#[derive(Debug)]
pub struct PromptResolver {
    client: ApiClient,
    detail_url_base: String,
}

impl PromptResolver {
    /// Creates a resolver that fetches from `{detail_url_base}/{command}`.
    pub fn new(client: ApiClient, detail_url_base: impl Into<String>) -> Self {
        Self {
            client,
            detail_url_base: detail_url_base.into(),
        }
    }

    /// Resolves the prompt text for `command_name`.
    ///
    /// Blocks on network I/O; callers in latency-sensitive contexts should
    /// expect multi-hundred-millisecond stalls.
    pub async fn resolve(&self, command_name: &str) -> Result<String> {
        let url = format!("{}/{}", self.detail_url_base, command_name);
        tracing::debug!(target: "botprompts", "Making prompt call to {}", url);

        let payload = self.client.get(&url).await?;
        let detail: PromptDetailResponse = serde_json::from_value(payload)
            .map_err(|err| BotPromptsError::malformed(err.to_string()))?;

        Ok(detail.revision.prompt_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver_for(server: &MockServer) -> PromptResolver {
        PromptResolver::new(
            ApiClient::new(),
            format!("{}/api/v1/prompts/detail", server.uri()),
        )
    }

    #[tokio::test]
    async fn test_resolve_returns_nested_prompt_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/prompts/detail/foo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"revision": {"prompt_text": "hi", "version": 3}})),
            )
            .mount(&server)
            .await;

        let text = resolver_for(&server).resolve("foo").await.unwrap();
        assert_eq!(text, "hi");
    }

    #[tokio::test]
    async fn test_resolve_surfaces_status_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such prompt"))
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("foo").await.unwrap_err();
        assert!(err.is_status());
        assert_eq!(err.detail(), "no such prompt");
    }

    #[tokio::test]
    async fn test_resolve_does_not_panic_on_connection_refused() {
        let server = MockServer::builder().start().await;
        let resolver = resolver_for(&server);
        drop(server);

        let err = resolver.resolve("foo").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_resolve_flags_missing_revision() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prompt_text": "hi"})))
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("foo").await.unwrap_err();
        assert!(matches!(err, BotPromptsError::Malformed(_)));
    }
}
