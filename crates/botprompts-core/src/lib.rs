//! Core data provider for the botprompts chat plugin.
//!
//! The provider keeps a background-refreshed cache of prompt command names
//! from a remote catalog and fetches full prompt text on demand. The chat
//! framework glue lives in `botprompts-application`; this crate never talks
//! to the chat protocol itself.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod provider;
pub mod resolver;

// Re-export common entry points
pub use config::BotPromptsConfig;
pub use error::{BotPromptsError, Result};
pub use provider::PromptProvider;
