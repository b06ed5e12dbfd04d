//! Error types for the botprompts crates.

use thiserror::Error;

/// A shared error type for the prompt-catalog data provider.
///
/// Every failure mode of the remote catalog API is represented here as a
/// typed variant; nothing from the HTTP layer is allowed to escape the
/// provider as a panic or a foreign error type.
#[derive(Error, Debug, Clone)]
pub enum BotPromptsError {
    /// Network-level failure (connect, timeout, TLS, unreadable body)
    #[error("API request failed: {0}")]
    Transport(String),

    /// The catalog answered with a non-200 status
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A 200 response whose body did not match the expected shape
    #[error("Malformed API payload: {0}")]
    Malformed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BotPromptsError {
    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a Malformed error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a Status error
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// The user-visible failure detail.
    ///
    /// For status failures this is the raw response body, which is what the
    /// chat glue shows in place of prompt text when resolution fails.
    pub fn detail(&self) -> String {
        match self {
            Self::Status { body, .. } => body.clone(),
            Self::Transport(message) | Self::Malformed(message) | Self::Config(message) => {
                message.clone()
            }
        }
    }
}

/// A type alias for `Result<T, BotPromptsError>`.
pub type Result<T> = std::result::Result<T, BotPromptsError>;
