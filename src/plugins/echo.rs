//! Echo command.

use async_trait::async_trait;

use crate::commands::{CommandContext, CommandHandler};

pub struct Echo;

#[async_trait]
impl CommandHandler for Echo {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        if ctx.args.is_empty() {
            return ctx.reply_text(ctx.usage("echo.usage")).await;
        }
        ctx.reply_text(ctx.rest()).await
    }
}
