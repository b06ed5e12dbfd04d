//! Message handling: command matching, prompt composition, reply shaping.

use std::sync::Arc;

use botprompts_core::{BotPromptsConfig, PromptProvider};
use botprompts_interaction::{CompletionError, CompletionRequest, TextCompletionBackend};

const REPLY_TAG: &str = "(gpt)";
const ASK_FOR_INPUT: &str = "What would you like me to ask?";
const RATE_LIMITED: &str = "Error API rate limit reached.";
const SCHEMA_DRIFT: &str = "Error: API has changed its response structure. \
    Need to take a look at why the machine elves are on smoko.";
const API_MISBEHAVED: &str = "Error: Weird API behaviour. Try again in a little bit.";

/// Kind of incoming chat event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEventKind {
    /// A regular channel or direct message
    Privmsg,
    /// Anything else the chat framework produces (joins, notices, ...)
    Other,
}

/// An incoming chat message, as mapped by the host framework.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    pub kind: ChatEventKind,
    pub nick: String,
    pub text: String,
}

impl ChatEvent {
    /// Convenience constructor for a privmsg event.
    pub fn privmsg(nick: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: ChatEventKind::Privmsg,
            nick: nick.into(),
            text: text.into(),
        }
    }
}

/// Model parameters forwarded verbatim to the completion backend.
#[derive(Debug, Clone)]
pub struct ModelParams {
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub max_tokens: u32,
}

impl ModelParams {
    /// Pulls the passthrough parameters out of the plugin configuration.
    pub fn from_config(config: &BotPromptsConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            max_tokens: config.max_tokens,
        }
    }
}

/// Handles incoming chat messages, relaying matched prompt commands through
/// the completion backend.
pub struct MessageHandler {
    provider: PromptProvider,
    backend: Arc<dyn TextCompletionBackend>,
    params: ModelParams,
}

impl MessageHandler {
    /// Creates a handler around an already-started provider.
    pub fn new(
        provider: PromptProvider,
        backend: Arc<dyn TextCompletionBackend>,
        params: ModelParams,
    ) -> Self {
        Self {
            provider,
            backend,
            params,
        }
    }

    /// Handles one chat event.
    ///
    /// Returns the reply to say in the channel, or `None` to stay silent.
    /// Blocks on network I/O when the message matches a known command.
    pub async fn handle(&self, event: &ChatEvent) -> Option<String> {
        if event.kind != ChatEventKind::Privmsg {
            return None;
        }

        // Plain chatter without the command prefix is not for us
        let rest = event.text.strip_prefix('.')?;

        let mut words = rest.split(' ');
        let command = words.next().unwrap_or("");
        if command.is_empty() {
            return None;
        }

        if !self
            .provider
            .available_commands()
            .iter()
            .any(|known| known == command)
        {
            return None;
        }

        let args: Vec<&str> = words.collect();
        if args.is_empty() {
            return Some(self.reply(&event.nick, ASK_FOR_INPUT));
        }

        let prompt_text = match self.provider.prompt_text(command).await {
            Ok(text) => text,
            Err(err) => {
                // The failure detail is shown in place of generated text; it
                // is never forwarded to the completion API.
                tracing::error!(
                    target: "botprompts",
                    "Prompt resolution failed for {}: {}",
                    command,
                    err
                );
                return Some(self.reply(&event.nick, &err.detail()));
            }
        };

        // Catalog prompt, then the caller's input, then a persona
        // instruction, separated by new lines
        let user_input = args.join(" ");
        let prompt = format!(
            "{prompt_text}\n{user_input}\nPlease answer as if you were talking like {command}"
        );

        let request = CompletionRequest {
            prompt,
            model: self.params.model.clone(),
            temperature: self.params.temperature,
            top_p: self.params.top_p,
            frequency_penalty: self.params.frequency_penalty,
            max_tokens: self.params.max_tokens,
        };

        let reply = match self.backend.complete(&request).await {
            Ok(text) => sanitize_reply(&text),
            Err(err) if err.is_rate_limited() => RATE_LIMITED.to_string(),
            Err(CompletionError::Malformed(_)) => SCHEMA_DRIFT.to_string(),
            Err(err) => {
                tracing::error!(target: "botprompts", "Completion request failed: {}", err);
                API_MISBEHAVED.to_string()
            }
        };

        Some(self.reply(&event.nick, &reply))
    }

    fn reply(&self, nick: &str, text: &str) -> String {
        format!("{nick}: {REPLY_TAG} {text}")
    }

    /// Stops the provider's background refresh. Idempotent.
    pub async fn shutdown(&self) {
        self.provider.shutdown().await;
    }
}

/// Flattens the completion onto one chat line and scrubs the jailbreak
/// persona name before it reaches the channel.
fn sanitize_reply(text: &str) -> String {
    text.replace("\n\n", " ")
        .replace('\n', " ")
        .replace("DAN", "machine elves")
}
