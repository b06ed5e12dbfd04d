//! Plugin configuration model.
//!
//! Mirrors the `[botprompts]` section of the host bot's configuration file.
//! Loading is the host's concern; this module only defines the shape,
//! defaults, and validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BotPromptsError, Result};

fn default_freq() -> f64 {
    15.0
}

fn default_temperature() -> f64 {
    1.0
}

fn default_top_p() -> f64 {
    1.0
}

fn default_frequency_penalty() -> f64 {
    1.0
}

fn default_max_tokens() -> u32 {
    2048
}

/// Configuration consumed by the provider and the completion glue.
///
/// The model parameters are passed through to the completion API verbatim;
/// nothing here clamps or validates them.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BotPromptsConfig {
    /// Base URL of the prompt catalog, without the `/api/v1` suffix.
    #[serde(default)]
    pub botprompts_api: String,

    /// Seconds between refreshes of the command list. Must be positive.
    #[serde(default = "default_freq")]
    pub freq_check_new_commands: f64,

    /// API key for the text-completion service.
    #[serde(default)]
    pub openai_key: String,

    /// Completion model id.
    #[serde(default)]
    pub model: String,

    /// Model sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Model top_p.
    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Model frequency penalty.
    #[serde(default = "default_frequency_penalty")]
    pub frequency_penalty: f64,

    /// Maximum number of tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for BotPromptsConfig {
    fn default() -> Self {
        Self {
            botprompts_api: String::new(),
            freq_check_new_commands: default_freq(),
            openai_key: String::new(),
            model: String::new(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            frequency_penalty: default_frequency_penalty(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl BotPromptsConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// Missing fields fall back to their defaults; call
    /// [`BotPromptsConfig::validate`] before handing the result to the
    /// provider.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| BotPromptsError::config(err.to_string()))
    }

    /// Checks the invariants the provider relies on.
    pub fn validate(&self) -> Result<()> {
        if self.botprompts_api.trim().is_empty() {
            return Err(BotPromptsError::config("botprompts_api must be set"));
        }

        if !self.freq_check_new_commands.is_finite() || self.freq_check_new_commands <= 0.0 {
            return Err(BotPromptsError::config(
                "freq_check_new_commands must be a positive number of seconds",
            ));
        }

        Ok(())
    }

    /// The command-list refresh interval as a [`Duration`].
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(self.freq_check_new_commands)
    }
}
