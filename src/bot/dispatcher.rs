//! Telegram update dispatcher.
//!
//! Every message update is converted into an [`InboundEvent`] and handed to
//! the [`Router`]; teloxide only provides transport.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{Me, PhotoSize};
use tracing::debug;

use crate::router::{InboundEvent, MediaRef, MessageContent, Router};

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// The dispatcher type run by polling and webhook modes.
pub type BotDispatcher = Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>;

/// Build the dispatcher around `router`.
pub fn build_dispatcher(bot: ThrottledBot, router: Arc<Router>) -> BotDispatcher {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![router])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().endpoint(route_message)
}

async fn route_message(msg: Message, me: Me, router: Arc<Router>) -> anyhow::Result<()> {
    let event = to_event(&msg, me.id);
    let disposition = router.handle(&event).await;
    debug!("Message {} in {}: {:?}", msg.id, msg.chat.id, disposition);
    Ok(())
}

/// Convert a Telegram message into the transport-neutral event.
pub fn to_event(msg: &Message, me: UserId) -> InboundEvent {
    let from = msg.from.as_ref();
    let is_group = msg.chat.is_group() || msg.chat.is_supergroup();

    let sender_name = from
        .map(|u| u.full_name())
        .or_else(|| msg.chat.title().map(str::to_string))
        .unwrap_or_default();

    let media = msg
        .photo()
        .or_else(|| msg.reply_to_message().and_then(Message::photo))
        .and_then(largest)
        .map(|p| MediaRef {
            file_id: p.file.id.to_string(),
        });

    InboundEvent {
        from_self: from.is_some_and(|u| u.id == me),
        content: MessageContent {
            text: msg.text().map(str::to_string),
            extended_text: None,
            caption: msg.caption().map(str::to_string),
        },
        conversation: msg.chat.id.0.to_string(),
        participant: if is_group {
            from.map(|u| u.id.0.to_string())
        } else {
            None
        },
        sender_name,
        is_group,
        message_id: Some(msg.id.0.to_string()),
        media,
        received_at: msg.date,
    }
}

fn largest(photo: &[PhotoSize]) -> Option<&PhotoSize> {
    photo.iter().max_by_key(|p| p.width * p.height)
}
