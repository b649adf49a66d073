//! Owner-only commands: broadcast and chat statistics.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::commands::{CommandContext, CommandHandler};
use crate::router::OutboundMessage;

/// Send a message to every tracked chat.
pub struct Broadcast;

#[async_trait]
impl CommandHandler for Broadcast {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let message = ctx.rest();
        if message.is_empty() {
            return ctx.reply_text(ctx.usage("broadcast.usage")).await;
        }

        let body = ctx.text("broadcast.header").replace("{message}", &message);
        let targets = ctx.state.db.chats.ids().await;
        info!("Broadcasting to {} chats", targets.len());

        let mut sent = 0usize;
        let mut failed = 0usize;
        for target in &targets {
            match ctx
                .state
                .outbound
                .send(target, OutboundMessage::text(body.clone()), None)
                .await
            {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!("Broadcast to {} failed: {}", target, e);
                    failed += 1;
                }
            }
        }

        let report = ctx
            .text("broadcast.report")
            .replace("{sent}", &sent.to_string())
            .replace("{failed}", &failed.to_string());
        ctx.reply_text(report).await
    }
}

/// Tracked chat and seen user counts.
pub struct ChatStats;

#[async_trait]
impl CommandHandler for ChatStats {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let db = &ctx.state.db;
        let cache = ctx.state.quran.cache_stats();
        let text = ctx
            .text("chatstats.text")
            .replace("{chats}", &db.chats.len().await.to_string())
            .replace("{users}", &db.users.len().await.to_string())
            .replace("{quizzes}", &ctx.state.quiz.store().len().to_string())
            .replace("{hits}", &cache.hits.to_string())
            .replace("{misses}", &cache.misses.to_string());
        ctx.reply_text(text).await
    }
}

#[cfg(test)]
mod tests {
    use crate::permissions::Denial;
    use crate::plugins::test_support::{OWNER, bot};
    use crate::router::Disposition;
    use crate::router::testing::TestBot;

    #[tokio::test]
    async fn broadcast_reaches_tracked_chats_and_reports_failures() {
        let bot = bot().await;
        bot.router.handle(&TestBot::group("g1", "alice", "hi")).await;
        bot.router.handle(&TestBot::group("g2", "bob", "hi")).await;
        bot.outbound.fail_for("g2");

        bot.router
            .handle(&TestBot::direct(OWNER, "/broadcast Jumuah Mubarak"))
            .await;

        assert!(bot.outbound.last_text("g1").unwrap().contains("Jumuah Mubarak"));
        // g1 and the owner's own chat succeed, g2 fails.
        let report = bot.outbound.last_text(OWNER).unwrap();
        assert!(report.contains("Sent: 2") && report.contains("failed: 1"), "{report}");
    }

    #[tokio::test]
    async fn broadcast_is_refused_for_others() {
        let bot = bot().await;
        assert_eq!(
            bot.router.handle(&TestBot::direct("alice", "/broadcast hi")).await,
            Disposition::Denied("broadcast".into(), Denial::OwnerOnly)
        );
        assert!(bot.outbound.last_text("alice").unwrap().contains("owner"));
    }

    #[tokio::test]
    async fn chatstats_counts_tracked_state() {
        let bot = bot().await;
        bot.router.handle(&TestBot::group("g1", "alice", "hi")).await;
        bot.router.handle(&TestBot::direct(OWNER, "/chatstats")).await;

        let text = bot.outbound.last_text(OWNER).unwrap();
        // g1 and the owner's chat; three seeded users.
        assert!(text.contains("chats: 2"), "{text}");
        assert!(text.contains("users: 3"), "{text}");
    }
}
