//! Per-invocation command context.

use crate::bot::AppState;
use crate::i18n::get_text;
use crate::router::{InboundEvent, OutboundMessage};

use super::CommandRegistry;

/// Everything a handler needs to serve one invocation.
pub struct CommandContext<'a> {
    pub state: &'a AppState,
    pub registry: &'a CommandRegistry,
    pub event: &'a InboundEvent,
    /// Prefix the command was invoked with.
    pub prefix: &'a str,
    /// Lowercased command token as typed (may be an alias).
    pub command: String,
    /// Whitespace-separated arguments.
    pub args: Vec<String>,
}

impl CommandContext<'_> {
    pub fn conversation(&self) -> &str {
        &self.event.conversation
    }

    pub fn originator(&self) -> &str {
        self.event.originator()
    }

    /// Arguments joined back with single spaces.
    pub fn rest(&self) -> String {
        self.args.join(" ")
    }

    /// Localized text in the bot's language.
    pub fn text(&self, key: &str) -> String {
        get_text(&self.state.config.lang, key)
    }

    /// Localized text with `{prefix}` and `{command}` filled in.
    pub fn usage(&self, key: &str) -> String {
        self.text(key)
            .replace("{prefix}", self.prefix)
            .replace("{command}", &self.command)
    }

    /// Send a message to the invoking conversation, quoting the command.
    pub async fn reply(&self, message: OutboundMessage) -> anyhow::Result<()> {
        self.state
            .outbound
            .send(
                &self.event.conversation,
                message,
                self.event.message_id.as_deref(),
            )
            .await
    }

    /// Reply with plain text.
    pub async fn reply_text(&self, text: impl Into<String>) -> anyhow::Result<()> {
        self.reply(OutboundMessage::text(text)).await
    }
}
