//! Chat-side glue for the botprompts plugin.
//!
//! The host chat framework maps its own trigger type into a [`ChatEvent`],
//! feeds it to [`MessageHandler::handle`], and relays the returned reply (if
//! any) back to the channel. The handler is constructed once at startup with
//! an injected provider and completion backend; the host calls
//! [`MessageHandler::shutdown`] at teardown.

mod handler;

pub use handler::{ChatEvent, ChatEventKind, MessageHandler, ModelParams};
