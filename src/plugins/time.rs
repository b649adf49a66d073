//! Time command.

use async_trait::async_trait;
use chrono::Local;

use crate::commands::{CommandContext, CommandHandler};

pub struct Time;

#[async_trait]
impl CommandHandler for Time {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let now = Local::now();
        let text = ctx
            .text("time.text")
            .replace("{date}", &now.format("%A, %d %B %Y").to_string())
            .replace("{time}", &now.format("%H:%M:%S (UTC%:z)").to_string());
        ctx.reply_text(text).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Local};

    use crate::plugins::test_support::bot;
    use crate::router::testing::TestBot;

    #[tokio::test]
    async fn time_fills_date_and_clock() {
        let bot = bot().await;
        bot.router.handle(&TestBot::direct("alice", "/time")).await;

        let text = bot.outbound.last_text("alice").unwrap();
        assert!(!text.contains("{date}") && !text.contains("{time}"), "{text}");
        assert!(text.contains("UTC"), "{text}");
        assert!(text.contains(&Local::now().year().to_string()), "{text}");
    }
}
