//! Sticker command: send the attached or replied-to photo back as a sticker.

use async_trait::async_trait;

use crate::commands::{CommandContext, CommandHandler};
use crate::router::OutboundMessage;

pub struct Sticker;

#[async_trait]
impl CommandHandler for Sticker {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let Some(media) = &ctx.event.media else {
            return ctx.reply_text(ctx.usage("sticker.usage")).await;
        };

        let config = &ctx.state.config;
        ctx.reply(OutboundMessage::Sticker {
            file_id: media.file_id.clone(),
            pack: config.sticker_pack.clone(),
            author: config.sticker_author.clone(),
        })
        .await
    }
}
