//! Telegram implementation of the outbound send primitive.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile, MessageId, ReplyParameters};
use tracing::debug;
use url::Url;

use super::ThrottledBot;
use crate::router::{Outbound, OutboundMessage, Presence};

/// Sends through the throttled bot, so Telegram's flood limits are respected.
#[derive(Clone)]
pub struct TelegramOutbound {
    bot: ThrottledBot,
}

impl TelegramOutbound {
    pub fn new(bot: ThrottledBot) -> Self {
        Self { bot }
    }
}

fn chat_id(conversation: &str) -> anyhow::Result<ChatId> {
    let id = conversation
        .parse::<i64>()
        .map_err(|_| anyhow::anyhow!("not a Telegram chat id: {conversation}"))?;
    Ok(ChatId(id))
}

/// Reply target, if `quoted` is a Telegram message id.
fn reply_to(quoted: Option<&str>) -> Option<ReplyParameters> {
    quoted
        .and_then(|q| q.parse::<i32>().ok())
        .map(|id| ReplyParameters::new(MessageId(id)))
}

#[async_trait]
impl Outbound for TelegramOutbound {
    async fn send(
        &self,
        conversation: &str,
        message: OutboundMessage,
        quoted: Option<&str>,
    ) -> anyhow::Result<()> {
        let chat = chat_id(conversation)?;
        let reply = reply_to(quoted);

        match message {
            OutboundMessage::Text(text) => {
                let mut req = self.bot.send_message(chat, text);
                if let Some(reply) = reply {
                    req = req.reply_parameters(reply);
                }
                req.await?;
            }
            OutboundMessage::Image { url, caption } => {
                let mut req = self.bot.send_photo(chat, InputFile::url(Url::parse(&url)?));
                if let Some(caption) = caption {
                    req = req.caption(caption);
                }
                if let Some(reply) = reply {
                    req = req.reply_parameters(reply);
                }
                req.await?;
            }
            OutboundMessage::Audio { url } => {
                let mut req = self.bot.send_audio(chat, InputFile::url(Url::parse(&url)?));
                if let Some(reply) = reply {
                    req = req.reply_parameters(reply);
                }
                req.await?;
            }
            OutboundMessage::Sticker { file_id, pack, author } => {
                // Telegram keeps pack metadata on sticker sets, not on single stickers.
                debug!("Sending sticker for pack {} by {}", pack, author);
                let mut req = self.bot.send_sticker(chat, InputFile::file_id(file_id));
                if let Some(reply) = reply {
                    req = req.reply_parameters(reply);
                }
                req.await?;
            }
        }

        Ok(())
    }

    async fn presence(&self, conversation: &str, presence: Presence) -> anyhow::Result<()> {
        match presence {
            Presence::Typing => {
                self.bot
                    .send_chat_action(chat_id(conversation)?, ChatAction::Typing)
                    .await?;
            }
            // Bots have no read receipts on Telegram.
            Presence::Read => {}
        }
        Ok(())
    }
}
