//! Test doubles for the messaging client.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tempfile::TempDir;

use super::{InboundEvent, MessageContent, Outbound, OutboundMessage, Presence, Router};
use crate::bot::AppState;
use crate::commands::CommandRegistry;
use crate::config::Config;
use crate::database::Database;
use crate::quiz::{Question, QuestionBank};

/// A sent message as recorded by [`RecordingOutbound`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    pub conversation: String,
    pub message: OutboundMessage,
    pub quoted: Option<String>,
}

/// Outbound that records everything instead of sending it.
///
/// Sends to conversations listed in `failing` return an error.
#[derive(Default)]
pub struct RecordingOutbound {
    sent: Mutex<Vec<Sent>>,
    presence: Mutex<Vec<(String, Presence)>>,
    failing: Mutex<Vec<String>>,
}

impl RecordingOutbound {
    pub fn fail_for(&self, conversation: &str) {
        self.failing.lock().push(conversation.to_string());
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn presence(&self) -> Vec<(String, Presence)> {
        self.presence.lock().clone()
    }

    /// Text bodies sent to `conversation`, in order.
    pub fn texts_to(&self, conversation: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|s| s.conversation == conversation)
            .filter_map(|s| match &s.message {
                OutboundMessage::Text(text) => Some(text.clone()),
                OutboundMessage::Image { caption, .. } => caption.clone(),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self, conversation: &str) -> Option<String> {
        self.texts_to(conversation).pop()
    }

    /// Number of text messages (any conversation) containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|s| matches!(&s.message, OutboundMessage::Text(t) if t.contains(needle)))
            .count()
    }
}

#[async_trait]
impl Outbound for RecordingOutbound {
    async fn send(
        &self,
        conversation: &str,
        message: OutboundMessage,
        quoted: Option<&str>,
    ) -> anyhow::Result<()> {
        if self.failing.lock().iter().any(|c| c == conversation) {
            anyhow::bail!("send to {conversation} failed");
        }
        self.sent.lock().push(Sent {
            conversation: conversation.to_string(),
            message,
            quoted: quoted.map(str::to_string),
        });
        Ok(())
    }

    async fn presence(&self, conversation: &str, presence: Presence) -> anyhow::Result<()> {
        self.presence.lock().push((conversation.to_string(), presence));
        Ok(())
    }
}

/// A router wired to a [`RecordingOutbound`] and a throwaway data directory.
pub struct TestBot {
    pub router: Router,
    pub outbound: Arc<RecordingOutbound>,
    _data: TempDir,
}

impl TestBot {
    /// Account name the router answers `/command@username` for.
    pub const USERNAME: &'static str = "nur_bot";

    pub async fn new(mut config: Config, registry: CommandRegistry, questions: Vec<Question>) -> Self {
        let data = tempfile::tempdir().expect("create temp dir");
        config.data_dir = data.path().to_path_buf();

        let outbound = Arc::new(RecordingOutbound::default());
        let db = Database::open(&config.data_dir).await;
        let state = AppState::new(
            config,
            outbound.clone(),
            db,
            QuestionBank::from_questions(questions),
        )
        .expect("build state");

        Self {
            router: Router::new(state, Arc::new(registry)).with_bot_username(Self::USERNAME),
            outbound,
            _data: data,
        }
    }

    pub fn state(&self) -> &AppState {
        self.router.state()
    }

    /// Mark `user` as already welcomed so direct messages skip the greeting.
    pub async fn seen(&self, user: &str) {
        self.state().db.users.insert(user).await;
    }

    /// A direct message from `sender`.
    pub fn direct(sender: &str, text: &str) -> InboundEvent {
        event(sender, None, text)
    }

    /// A group message from `participant` in `group`.
    pub fn group(group: &str, participant: &str, text: &str) -> InboundEvent {
        event(group, Some(participant), text)
    }
}

fn event(conversation: &str, participant: Option<&str>, text: &str) -> InboundEvent {
    InboundEvent {
        from_self: false,
        content: MessageContent {
            text: Some(text.to_string()),
            ..Default::default()
        },
        conversation: conversation.to_string(),
        participant: participant.map(str::to_string),
        sender_name: participant.unwrap_or(conversation).to_string(),
        is_group: participant.is_some(),
        message_id: Some("1".to_string()),
        media: None,
        received_at: Utc::now(),
    }
}
