//! Outbound text-completion clients.
//!
//! The chat glue composes a prompt and sends it through a
//! [`TextCompletionBackend`]; this crate ships the OpenAI-compatible
//! implementation used in production. Model parameters travel through
//! verbatim — nothing here validates or clamps them.

mod openai;

pub use openai::OpenAiCompletionClient;

use async_trait::async_trait;
use thiserror::Error;

/// A composed completion request with passthrough model parameters.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub max_tokens: u32,
}

/// Errors surfaced by a completion backend.
#[derive(Error, Debug, Clone)]
pub enum CompletionError {
    /// The request never produced a response
    #[error("completion request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status
    #[error("completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A success response that carried no usable completion text
    #[error("completion response had an unexpected shape: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// True when the service rejected the request for rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Api { status: 429, .. })
    }
}

/// Backend that turns a composed prompt into generated text.
#[async_trait]
pub trait TextCompletionBackend: Send + Sync {
    /// Generates text for the request. Blocks on network I/O.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
