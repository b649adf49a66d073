//! Dua command: a random supplication.

use async_trait::async_trait;

use crate::commands::{CommandContext, CommandHandler};
use crate::events::ambient::random_supplication;

pub struct Dua;

#[async_trait]
impl CommandHandler for Dua {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let text = random_supplication(&ctx.state.config.lang)
            .unwrap_or_else(|| ctx.text("dua.empty"));
        ctx.reply_text(text).await
    }
}

#[cfg(test)]
mod tests {
    use crate::events::ambient::SUPPLICATIONS;
    use crate::i18n::get_list;
    use crate::plugins::test_support::bot;
    use crate::router::testing::TestBot;

    #[tokio::test]
    async fn arabic_alias_sends_a_supplication() {
        let bot = bot().await;
        bot.router.handle(&TestBot::direct("alice", "/دعاء")).await;

        let text = bot.outbound.last_text("alice").unwrap();
        assert!(get_list("en", SUPPLICATIONS).contains(&text), "{text}");
    }
}
