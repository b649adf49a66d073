//! Quiz command: start a quiz in the current conversation.

use async_trait::async_trait;
use tracing::debug;

use crate::commands::{CommandContext, CommandHandler};

pub struct Quiz;

#[async_trait]
impl CommandHandler for Quiz {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let outcome = ctx
            .state
            .quiz
            .start(ctx.conversation(), ctx.event.message_id.as_deref())
            .await?;
        debug!("Quiz start in {}: {:?}", ctx.conversation(), outcome);
        Ok(())
    }
}
