//! Info command: bot name, uptime and setup.

use async_trait::async_trait;

use crate::commands::{CommandContext, CommandHandler};
use crate::utils::format_duration;

pub struct Info;

#[async_trait]
impl CommandHandler for Info {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let config = &ctx.state.config;
        let uptime = format_duration(ctx.state.started_at.elapsed().as_secs());

        let text = ctx
            .text("info.text")
            .replace("{bot}", &config.bot_name)
            .replace("{uptime}", &uptime)
            .replace("{commands}", &ctx.registry.len().to_string())
            .replace("{prefixes}", &config.prefixes.join(" "))
            .replace("{questions}", &ctx.state.quiz.bank().len().to_string())
            .replace("{pack}", &config.sticker_pack)
            .replace("{author}", &config.sticker_author);

        ctx.reply_text(text).await
    }
}
