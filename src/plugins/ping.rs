//! Ping command plugin.
//!
//! Reports the delay between the message timestamp and its handling.

use async_trait::async_trait;
use chrono::Utc;

use crate::commands::{CommandContext, CommandHandler};

pub struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let ms = (Utc::now() - ctx.event.received_at).num_milliseconds().max(0);

        // Choose emoji based on latency
        let emoji = if ms < 1000 {
            "🟢"
        } else if ms < 3000 {
            "🟡"
        } else {
            "🔴"
        };

        let text = ctx
            .text("ping.text")
            .replace("{emoji}", emoji)
            .replace("{ms}", &ms.to_string());
        ctx.reply_text(text).await
    }
}

#[cfg(test)]
mod tests {
    use crate::plugins::test_support::bot;
    use crate::router::testing::TestBot;

    #[tokio::test]
    async fn ping_quotes_the_command() {
        let bot = bot().await;
        bot.router.handle(&TestBot::direct("alice", "/ping")).await;

        let sent = bot.outbound.sent();
        let last = sent.last().unwrap();
        assert_eq!(last.quoted.as_deref(), Some("1"));
        assert!(bot.outbound.last_text("alice").unwrap().contains("ms"));
    }
}
