//! Provider facade composing the command catalog and prompt resolver.

use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiClient;
use crate::catalog::{CommandCatalog, HttpCommandSource};
use crate::config::BotPromptsConfig;
use crate::error::{BotPromptsError, Result};
use crate::resolver::PromptResolver;

/// Stateful data provider for bot prompts.
///
/// Owns the background-refreshed command catalog and the on-demand prompt
/// resolver. Construct once at startup, inject into the chat glue, and call
/// [`PromptProvider::shutdown`] at teardown (extra calls are harmless).
#[derive(Debug)]
pub struct PromptProvider {
    catalog: CommandCatalog,
    resolver: PromptResolver,
}

impl PromptProvider {
    /// Creates the provider and starts its refresh cycle.
    ///
    /// `base_api_url` is the catalog root without the `/api/v1` suffix.
    /// The commands-list URL and the detail URL template are derived here,
    /// once. Fails if the URL is empty or the interval is not positive.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(base_api_url: &str, refresh_interval: Duration) -> Result<Self> {
        if base_api_url.trim().is_empty() {
            return Err(BotPromptsError::config("botprompts API base URL is empty"));
        }
        if refresh_interval.is_zero() {
            return Err(BotPromptsError::config("refresh interval must be positive"));
        }

        tracing::debug!(target: "botprompts", "Initializing bot prompts from {}", base_api_url);

        let api_root = format!("{}/api/v1", base_api_url.trim_end_matches('/'));
        let commands_url = format!("{api_root}/prompts/commands");
        let detail_url_base = format!("{api_root}/prompts/detail");

        let client = ApiClient::new();
        let source = Arc::new(HttpCommandSource::new(client.clone(), commands_url));
        let catalog = CommandCatalog::start(source, refresh_interval);
        let resolver = PromptResolver::new(client, detail_url_base);

        Ok(Self { catalog, resolver })
    }

    /// Creates a provider from a loaded configuration.
    pub fn from_config(config: &BotPromptsConfig) -> Result<Self> {
        config.validate()?;
        Self::new(&config.botprompts_api, config.refresh_interval())
    }

    /// Returns the currently known command names.
    ///
    /// A snapshot of the most recently completed refresh; never touches the
    /// network. Empty until the first refresh completes, after a failed
    /// refresh, and after shutdown.
    pub fn available_commands(&self) -> Vec<String> {
        let commands = self.catalog.snapshot();
        tracing::debug!(target: "botprompts", "Available bot prompt commands: {:?}", commands);
        commands
    }

    /// Fetches the prompt text for `command_name`.
    ///
    /// Always live, never cached; blocks on network I/O.
    pub async fn prompt_text(&self, command_name: &str) -> Result<String> {
        self.resolver.resolve(command_name).await
    }

    /// Stops the background refresh. Idempotent.
    pub async fn shutdown(&self) {
        self.catalog.shutdown().await;
    }
}
