//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::database::Database;
use crate::events::RateLimiter;
use crate::i18n::get_text;
use crate::permissions::Permissions;
use crate::quiz::{QuestionBank, QuizEngine, SessionStore};
use crate::router::Outbound;
use crate::services::QuranClient;

/// Process-wide state handed to the router and every command.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Send primitive of the messaging client.
    pub outbound: Arc<dyn Outbound>,

    /// Tracked chats and seen users.
    pub db: Arc<Database>,

    /// Quiz sessions and question pool.
    pub quiz: Arc<QuizEngine>,

    /// Quran content provider.
    pub quran: Arc<QuranClient>,

    /// Per-sender command rate limiter.
    pub limiter: RateLimiter,

    /// Owner and scope checks.
    pub permissions: Permissions,

    pub started_at: Instant,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: Config,
        outbound: Arc<dyn Outbound>,
        db: Database,
        bank: QuestionBank,
    ) -> anyhow::Result<Self> {
        let quran = Arc::new(QuranClient::new(&config)?);
        let quiz = Arc::new(QuizEngine::new(
            Arc::new(SessionStore::new()),
            Arc::new(bank),
            Arc::clone(&outbound),
            config.quiz_timeout,
            config.lang.clone(),
        ));
        let limiter = RateLimiter::new(&config.rate_limit);
        let permissions = Permissions::new(config.owners.clone());

        Ok(Self {
            config: Arc::new(config),
            outbound,
            db: Arc::new(db),
            quiz,
            quran,
            limiter,
            permissions,
            started_at: Instant::now(),
        })
    }

    /// Localized text in the configured language.
    pub fn text(&self, key: &str) -> String {
        get_text(&self.config.lang, key)
    }
}
