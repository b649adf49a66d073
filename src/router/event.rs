//! Transport-neutral event model.
//!
//! The messaging client is an external collaborator: the adapter in
//! `bot::dispatcher` converts its updates into [`InboundEvent`] and
//! implements [`Outbound`] on top of its send API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Textual content of an inbound message.
///
/// Clients expose text in different places depending on the message kind;
/// at most one of these is usually populated.
#[derive(Debug, Clone, Default)]
pub struct MessageContent {
    pub text: Option<String>,
    /// Extended (quoted/formatted) text.
    pub extended_text: Option<String>,
    /// Caption attached to a photo, video or document.
    pub caption: Option<String>,
}

impl MessageContent {
    /// First non-empty text field, or an empty string.
    pub fn plain_text(&self) -> &str {
        [&self.text, &self.extended_text, &self.caption]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|t| !t.is_empty())
            .unwrap_or("")
    }
}

/// Reference to media the client already holds (e.g. a Telegram file id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub file_id: String,
}

/// An inbound chat event.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Sent by the bot account itself.
    pub from_self: bool,
    pub content: MessageContent,
    /// Conversation (chat) identifier.
    pub conversation: String,
    /// Group participant that sent the message. `None` for direct chats.
    pub participant: Option<String>,
    pub sender_name: String,
    pub is_group: bool,
    pub message_id: Option<String>,
    /// Photo attached to the message or to the message it replies to.
    pub media: Option<MediaRef>,
    pub received_at: DateTime<Utc>,
}

impl InboundEvent {
    /// True originating identity: the participant in groups, the
    /// conversation itself otherwise.
    pub fn originator(&self) -> &str {
        match (&self.participant, self.is_group) {
            (Some(participant), true) => participant,
            _ => &self.conversation,
        }
    }
}

/// Outbound message payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    Text(String),
    Image { url: String, caption: Option<String> },
    Audio { url: String },
    Sticker { file_id: String, pack: String, author: String },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Presence signals some clients support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Read,
    Typing,
}

/// Send primitive provided by the messaging client.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Send `message` to `conversation`, optionally quoting `quoted`.
    async fn send(
        &self,
        conversation: &str,
        message: OutboundMessage,
        quoted: Option<&str>,
    ) -> anyhow::Result<()>;

    /// Signal presence. Clients without the concept ignore it.
    async fn presence(&self, _conversation: &str, _presence: Presence) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_prefers_first_populated_field() {
        let content = MessageContent {
            text: None,
            extended_text: Some("quoted".into()),
            caption: Some("caption".into()),
        };
        assert_eq!(content.plain_text(), "quoted");

        let content = MessageContent {
            text: Some(String::new()),
            extended_text: None,
            caption: Some("caption".into()),
        };
        assert_eq!(content.plain_text(), "caption");

        assert_eq!(MessageContent::default().plain_text(), "");
    }
}
