//! Background-refreshed cache of known prompt commands.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::api::ApiClient;
use crate::error::{BotPromptsError, Result};

/// Source of the current command list.
///
/// The production implementation is [`HttpCommandSource`]; tests inject
/// scripted sources to drive refresh outcomes deterministically.
#[async_trait]
pub trait CommandSource: Send + Sync + 'static {
    /// Fetches the full list of known command names.
    async fn fetch_commands(&self) -> Result<Vec<String>>;
}

/// [`CommandSource`] backed by the catalog HTTP API.
pub struct HttpCommandSource {
    client: ApiClient,
    commands_url: String,
}

impl HttpCommandSource {
    /// Creates a source that fetches from the given commands-list URL.
    pub fn new(client: ApiClient, commands_url: impl Into<String>) -> Self {
        Self {
            client,
            commands_url: commands_url.into(),
        }
    }
}

#[async_trait]
impl CommandSource for HttpCommandSource {
    async fn fetch_commands(&self) -> Result<Vec<String>> {
        let payload = self.client.get(&self.commands_url).await?;

        let commands = payload
            .get("commands")
            .and_then(|value| value.as_array())
            .ok_or_else(|| BotPromptsError::malformed("response has no `commands` array"))?;

        // Order and duplicates are preserved exactly as received
        commands
            .iter()
            .map(|value| {
                value
                    .as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| BotPromptsError::malformed("`commands` entry is not a string"))
            })
            .collect()
    }
}

/// Background-refreshed, thread-safe cache of command names.
///
/// The refresh task polls the source immediately on startup and then on a
/// fixed interval. A successful fetch replaces the set wholesale; a failed
/// fetch empties it, so commands whose definitions may no longer exist are
/// never served from stale data.
#[derive(Debug)]
pub struct CommandCatalog {
    commands: Arc<RwLock<Vec<String>>>,
    shutdown_tx: watch::Sender<bool>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl CommandCatalog {
    /// Starts the catalog and its refresh task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(source: Arc<dyn CommandSource>, refresh_interval: Duration) -> Self {
        let commands = Arc::new(RwLock::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task_commands = Arc::clone(&commands);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(refresh_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(
                target: "botprompts",
                "Command refresh started ({:?} interval)",
                refresh_interval
            );

            loop {
                tokio::select! {
                    // The stop signal wins over a simultaneously-ready tick,
                    // and a finished refresh re-checks it before re-arming.
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        Self::refresh(source.as_ref(), &task_commands).await;
                    }
                }
            }

            tracing::debug!(target: "botprompts", "Command refresh stopped");
        });

        Self {
            commands,
            shutdown_tx,
            refresh_task: Mutex::new(Some(handle)),
        }
    }

    async fn refresh(source: &dyn CommandSource, commands: &RwLock<Vec<String>>) {
        let next = match source.fetch_commands().await {
            Ok(list) => {
                tracing::debug!(target: "botprompts", "Refreshed {} commands", list.len());
                list
            }
            Err(err) => {
                // Fail closed: an unreachable catalog disables every command
                tracing::error!(target: "botprompts", "Command refresh failed: {}", err);
                Vec::new()
            }
        };

        *commands.write().unwrap() = next;
    }

    /// Returns a copy of the current command set.
    ///
    /// Never touches the network and never observes a partially-applied
    /// refresh: the whole vector is swapped under the lock.
    pub fn snapshot(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    /// Stops the refresh task and clears the command set.
    ///
    /// Idempotent. When this returns, the task has exited: an in-flight
    /// refresh may have completed, but no further refresh can execute.
    pub async fn shutdown(&self) {
        let handle = self.refresh_task.lock().await.take();
        let Some(handle) = handle else {
            return;
        };

        let _ = self.shutdown_tx.send(true);
        if let Err(err) = handle.await {
            tracing::error!(target: "botprompts", "Refresh task ended abnormally: {}", err);
        }

        // A stopped catalog serves nothing
        self.commands.write().unwrap().clear();
    }
}
