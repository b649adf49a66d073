//! Per-event dispatch pipeline.
//!
//! Stages run strictly in order and each may end processing of the event:
//! self filter, text extraction, scope gates, first-contact welcome, ambient
//! reply, quiz answer interception, command parsing, rate limiting,
//! permission checks, handler execution.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::classifier::{ParsedCommand, parse_command};
use super::{InboundEvent, OutboundMessage, Presence};
use crate::bot::AppState;
use crate::commands::{CommandContext, CommandRegistry};
use crate::events::{ambient, welcome};
use crate::permissions::Denial;

/// Sweep idle rate limiter entries every this many events.
const SWEEP_EVERY: u64 = 256;

/// What the pipeline did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Sent by the bot itself.
    SelfOriginated,
    /// Dropped by a scope feature gate.
    Gated,
    /// Consumed as a quiz answer.
    QuizAnswered,
    /// Not a command (no prefix, or prefix only).
    NotCommand,
    /// Prefix present but the token is not registered.
    UnknownCommand(String),
    RateLimited(String),
    Denied(String, Denial),
    Handled(String),
    /// The handler returned an error; a failure notice was sent.
    Failed(String),
}

/// Routes inbound events to handlers.
pub struct Router {
    state: AppState,
    registry: Arc<CommandRegistry>,
    /// Our account name, for `/command@username` addressing.
    bot_username: Option<String>,
    processed: AtomicU64,
}

impl Router {
    pub fn new(state: AppState, registry: Arc<CommandRegistry>) -> Self {
        Self {
            state,
            registry,
            bot_username: None,
            processed: AtomicU64::new(0),
        }
    }

    /// Accept commands suffixed with `@username`. Commands addressed to any
    /// other account are treated as plain text.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Process a batch of events one after another, in order.
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn handle_batch(&self, events: &[InboundEvent]) -> Vec<Disposition> {
        let mut out = Vec::with_capacity(events.len());
        for event in events {
            out.push(self.handle(event).await);
        }
        out
    }

    /// Process one event. Never fails: handler errors are reported to the
    /// conversation and logged.
    pub async fn handle(&self, event: &InboundEvent) -> Disposition {
        if event.from_self {
            return Disposition::SelfOriginated;
        }

        if self.processed.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.state.limiter.sweep(Instant::now());
        }

        let config = &self.state.config;
        let text = event.content.plain_text();
        let conversation = event.conversation.as_str();

        if (event.is_group && !config.respond_in_groups)
            || (!event.is_group && !config.respond_in_private)
        {
            debug!("Scope gate dropped event in {}", conversation);
            return Disposition::Gated;
        }

        if config.log_messages {
            info!(
                "[{}] {} ({}): {}",
                if event.is_group { "group" } else { "private" },
                event.sender_name,
                event.originator(),
                text.chars().take(80).collect::<String>()
            );
        }

        if config.auto_read
            && let Err(e) = self.state.outbound.presence(conversation, Presence::Read).await
        {
            debug!("Failed to mark {} as read: {}", conversation, e);
        }

        self.state.db.chats.insert(conversation).await;

        if !event.is_group {
            welcome::greet_first_contact(&self.state, &self.registry, event).await;
        }

        if let Err(e) = ambient::maybe_reply(&self.state, event, text).await {
            warn!("Ambient reply failed in {}: {}", conversation, e);
        }

        if self.state.quiz.is_active(conversation) {
            match self
                .state
                .quiz
                .try_answer(conversation, text, event.message_id.as_deref())
                .await
            {
                Ok(Some(_)) => return Disposition::QuizAnswered,
                Ok(None) => {}
                Err(e) => {
                    // The session is already consumed; only the report failed.
                    error!("Failed to report quiz answer in {}: {}", conversation, e);
                    return Disposition::QuizAnswered;
                }
            }
        }

        let Some(parsed) = parse_command(text, &config.prefixes, self.bot_username.as_deref()) else {
            return Disposition::NotCommand;
        };

        self.dispatch(event, parsed).await
    }

    async fn dispatch(&self, event: &InboundEvent, parsed: ParsedCommand<'_>) -> Disposition {
        let Some(descriptor) = self.registry.resolve(&parsed.name) else {
            debug!("Unknown command: {}", parsed.name);
            return Disposition::UnknownCommand(parsed.name);
        };
        let name = descriptor.name.clone();
        let originator = event.originator();

        if self.state.limiter.check_and_record(originator) {
            warn!("Rate limited {} on command {}", originator, name);
            return Disposition::RateLimited(name);
        }

        if let Err(denial) =
            self.state
                .permissions
                .check(descriptor.permissions, originator, event.is_group)
        {
            debug!("Denied {} to {}: {:?}", name, originator, denial);
            self.notify(event, self.state.text(denial.key())).await;
            return Disposition::Denied(name, denial);
        }

        if self.state.config.auto_typing
            && let Err(e) = self
                .state
                .outbound
                .presence(&event.conversation, Presence::Typing)
                .await
        {
            debug!("Failed to send typing to {}: {}", event.conversation, e);
        }

        let ctx = CommandContext {
            state: &self.state,
            registry: &self.registry,
            event,
            prefix: parsed.prefix,
            command: parsed.name,
            args: parsed.args,
        };

        info!("Executing command {} for {}", name, originator);
        match descriptor.execute(&ctx).await {
            Ok(()) => Disposition::Handled(name),
            Err(e) => {
                error!("Command {} failed in {}: {:#}", name, event.conversation, e);
                self.notify(event, self.state.text("errors.generic")).await;
                Disposition::Failed(name)
            }
        }
    }

    /// Best-effort text to the event's conversation.
    async fn notify(&self, event: &InboundEvent, text: String) {
        if let Err(e) = self
            .state
            .outbound
            .send(
                &event.conversation,
                OutboundMessage::Text(text),
                event.message_id.as_deref(),
            )
            .await
        {
            warn!("Failed to notify {}: {}", event.conversation, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::commands::{Category, CommandDescriptor, CommandHandler};
    use crate::config::{Config, Owners};
    use crate::quiz::{Answer, Question};
    use crate::router::testing::TestBot;

    struct Fails;

    #[async_trait]
    impl CommandHandler for Fails {
        async fn execute(&self, _ctx: &CommandContext<'_>) -> anyhow::Result<()> {
            anyhow::bail!("upstream exploded")
        }
    }

    struct Pong;

    #[async_trait]
    impl CommandHandler for Pong {
        async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
            ctx.reply_text(format!("pong {}", ctx.rest())).await
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(CommandDescriptor::new("ping", Category::General, "commands.ping", Pong));
        registry.register(CommandDescriptor::new("boom", Category::General, "commands.ping", Fails));
        registry.register(
            CommandDescriptor::new("secret", Category::Owner, "commands.ping", Pong).owner_only(),
        );
        registry.register(
            CommandDescriptor::new("grouponly", Category::General, "commands.ping", Pong)
                .group_only(),
        );
        registry.register(
            CommandDescriptor::new("dmonly", Category::General, "commands.ping", Pong)
                .private_only(),
        );
        registry.register(
            CommandDescriptor::new("help", Category::General, "commands.help", Pong)
                .aliases(&["menu"]),
        );
        registry
    }

    fn quiz_question() -> Question {
        Question {
            question: "Q?".into(),
            answers: ["A", "B", "C"]
                .iter()
                .enumerate()
                .map(|(i, t)| Answer {
                    text: t.to_string(),
                    correct: i == 1,
                })
                .collect(),
        }
    }

    fn config() -> Config {
        let mut config = Config::for_tests();
        config.ambient_reply = false;
        config.owners = Owners {
            numbers: vec!["owner".into()],
            linked_ids: Vec::new(),
        };
        config
    }

    async fn bot(config: Config) -> TestBot {
        TestBot::new(config, registry(), vec![quiz_question()]).await
    }

    #[tokio::test]
    async fn self_events_are_ignored() {
        let bot = bot(config()).await;
        let mut event = TestBot::direct("alice", "/ping");
        event.from_self = true;
        assert_eq!(bot.router.handle(&event).await, Disposition::SelfOriginated);
        assert!(bot.outbound.sent().is_empty());
    }

    #[tokio::test]
    async fn command_is_case_insensitive() {
        let bot = bot(config()).await;
        bot.seen("alice").await;
        assert_eq!(
            bot.router.handle(&TestBot::direct("alice", "/PING x")).await,
            Disposition::Handled("ping".into())
        );
        assert_eq!(
            bot.router.handle(&TestBot::direct("alice", "/ping x")).await,
            Disposition::Handled("ping".into())
        );
        assert_eq!(bot.outbound.texts_to("alice"), vec!["pong x", "pong x"]);
    }

    #[tokio::test]
    async fn commands_addressed_to_other_bots_are_ignored() {
        let bot = bot(config()).await;
        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "alice", "/ping@some_other_bot")).await,
            Disposition::NotCommand
        );
        assert!(bot.outbound.sent().is_empty());

        let ours = format!("/ping@{} hi", TestBot::USERNAME.to_uppercase());
        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "alice", &ours)).await,
            Disposition::Handled("ping".into())
        );
        assert_eq!(bot.outbound.texts_to("g1"), vec!["pong hi"]);
    }

    #[tokio::test]
    async fn unknown_command_is_silent() {
        let bot = bot(config()).await;
        bot.seen("alice").await;
        assert_eq!(
            bot.router.handle(&TestBot::direct("alice", "/nothing")).await,
            Disposition::UnknownCommand("nothing".into())
        );
        assert!(bot.outbound.sent().is_empty());
    }

    #[tokio::test]
    async fn scope_gates_drop_events() {
        let mut cfg = config();
        cfg.respond_in_groups = false;
        let bot = bot(cfg).await;
        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "bob", "/ping")).await,
            Disposition::Gated
        );
        assert!(bot.outbound.sent().is_empty());

        let mut cfg = config();
        cfg.respond_in_private = false;
        let bot = self::bot(cfg).await;
        assert_eq!(
            bot.router.handle(&TestBot::direct("bob", "/ping")).await,
            Disposition::Gated
        );
    }

    #[tokio::test]
    async fn first_contact_runs_help_once_and_continues() {
        let bot = bot(config()).await;

        let first = bot.router.handle(&TestBot::direct("carol", "/ping")).await;
        assert_eq!(first, Disposition::Handled("ping".into()));
        // Welcome greeting, help output, then the command's own reply.
        let texts = bot.outbound.texts_to("carol");
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[2], "pong ");

        bot.router.handle(&TestBot::direct("carol", "/ping")).await;
        assert_eq!(bot.outbound.texts_to("carol").len(), 4);
        assert!(bot.state().db.users.contains("carol").await);
    }

    #[tokio::test]
    async fn group_messages_do_not_trigger_welcome() {
        let bot = bot(config()).await;
        bot.router.handle(&TestBot::group("g1", "dave", "hello")).await;
        assert!(bot.outbound.sent().is_empty());
        assert!(!bot.state().db.users.contains("dave").await);
        assert!(bot.state().db.chats.contains("g1").await);
    }

    #[tokio::test]
    async fn permission_denials_are_reported_in_order() {
        let bot = bot(config()).await;
        bot.seen("erin").await;

        assert_eq!(
            bot.router.handle(&TestBot::direct("erin", "/secret")).await,
            Disposition::Denied("secret".into(), Denial::OwnerOnly)
        );
        assert_eq!(
            bot.router.handle(&TestBot::direct("erin", "/grouponly")).await,
            Disposition::Denied("grouponly".into(), Denial::GroupOnly)
        );
        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "erin", "/dmonly")).await,
            Disposition::Denied("dmonly".into(), Denial::PrivateOnly)
        );
        assert_eq!(bot.outbound.texts_to("erin").len(), 2);
        assert_eq!(bot.outbound.texts_to("g1").len(), 1);
    }

    #[tokio::test]
    async fn owner_passes_owner_check() {
        let bot = bot(config()).await;
        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "owner", "/secret")).await,
            Disposition::Handled("secret".into())
        );
    }

    #[tokio::test]
    async fn failing_handler_reports_once_and_batch_continues() {
        let bot = bot(config()).await;
        bot.seen("frank").await;

        let results = bot
            .router
            .handle_batch(&[
                TestBot::direct("frank", "/boom"),
                TestBot::direct("frank", "/ping after"),
            ])
            .await;

        assert_eq!(
            results,
            vec![
                Disposition::Failed("boom".into()),
                Disposition::Handled("ping".into())
            ]
        );
        let texts = bot.outbound.texts_to("frank");
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("went wrong"), "{}", texts[0]);
        assert_eq!(texts[1], "pong after");
    }

    #[tokio::test]
    async fn rate_limit_blocks_silently() {
        let mut cfg = config();
        cfg.rate_limit.max_messages = 2;
        cfg.rate_limit.interval = Duration::from_secs(60);
        let bot = bot(cfg).await;
        bot.seen("gina").await;

        for _ in 0..2 {
            assert_eq!(
                bot.router.handle(&TestBot::direct("gina", "/ping")).await,
                Disposition::Handled("ping".into())
            );
        }
        assert_eq!(
            bot.router.handle(&TestBot::direct("gina", "/ping")).await,
            Disposition::RateLimited("ping".into())
        );
        assert_eq!(bot.outbound.texts_to("gina").len(), 2);
    }

    #[tokio::test]
    async fn rate_limit_is_keyed_by_participant() {
        let mut cfg = config();
        cfg.rate_limit.max_messages = 1;
        let bot = bot(cfg).await;

        bot.router.handle(&TestBot::group("g1", "hank", "/ping")).await;
        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "ivy", "/ping")).await,
            Disposition::Handled("ping".into())
        );
        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "hank", "/ping")).await,
            Disposition::RateLimited("ping".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn quiz_answer_is_intercepted_before_commands() {
        let bot = bot(config()).await;
        bot.state().quiz.start("g1", None).await.unwrap();

        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "jack", " 2 ")).await,
            Disposition::QuizAnswered
        );
        assert!(!bot.state().quiz.is_active("g1"));
        let report = bot.outbound.last_text("g1").unwrap();
        assert!(report.contains("Correct") && report.contains("2. B"), "{report}");
    }

    #[tokio::test(start_paused = true)]
    async fn non_answer_text_falls_through_to_commands() {
        let bot = bot(config()).await;
        bot.state().quiz.start("g1", None).await.unwrap();

        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "kim", "4")).await,
            Disposition::NotCommand
        );
        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "kim", "/ping")).await,
            Disposition::Handled("ping".into())
        );
        assert!(bot.state().quiz.is_active("g1"));
    }

    #[tokio::test]
    async fn answer_tokens_without_quiz_are_plain_text() {
        let bot = bot(config()).await;
        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "lee", "1")).await,
            Disposition::NotCommand
        );
    }

    #[tokio::test]
    async fn text_is_taken_from_caption() {
        let bot = bot(config()).await;
        bot.seen("mia").await;
        let mut event = TestBot::direct("mia", "");
        event.content.text = None;
        event.content.caption = Some("/ping photo".into());
        assert_eq!(
            bot.router.handle(&event).await,
            Disposition::Handled("ping".into())
        );
    }

    #[tokio::test]
    async fn ambient_reply_does_not_consume_commands() {
        let mut cfg = config();
        cfg.ambient_reply = true;
        cfg.ambient_chance = 1;
        let bot = bot(cfg).await;

        assert_eq!(
            bot.router.handle(&TestBot::group("g1", "noor", "/ping سلام")).await,
            Disposition::Handled("ping".into())
        );
        // Supplication plus the command reply.
        assert_eq!(bot.outbound.texts_to("g1").len(), 2);
    }

    #[tokio::test]
    async fn auto_typing_signals_before_handler() {
        let mut cfg = config();
        cfg.auto_typing = true;
        cfg.auto_read = true;
        let bot = bot(cfg).await;
        bot.router.handle(&TestBot::group("g1", "omar", "/ping")).await;

        let presence = bot.outbound.presence();
        assert_eq!(
            presence,
            vec![
                ("g1".to_string(), Presence::Read),
                ("g1".to_string(), Presence::Typing)
            ]
        );
    }
}
