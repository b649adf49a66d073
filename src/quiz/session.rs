//! Per-conversation quiz session store.
//!
//! The store is the single source of truth for whether a quiz is live. Both
//! consumers of a session (an answer and the expiry timer) remove it with an
//! atomic take, so exactly one of them ever acts on it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::AbortHandle;

use super::Question;

/// A live quiz in one conversation.
#[derive(Debug)]
pub struct QuizSession {
    pub id: u64,
    pub question: Arc<Question>,
    timer: Option<AbortHandle>,
}

impl QuizSession {
    /// Cancel the expiry timer, if one is armed.
    pub fn cancel_timer(&self) {
        if let Some(timer) = &self.timer {
            timer.abort();
        }
    }
}

/// Conversation id -> live session.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, QuizSession>,
    next_id: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session unless one is already live in `conversation`.
    ///
    /// `arm` receives the new session id and returns the handle of its expiry
    /// timer. Returns the session id, or `None` if a session already exists
    /// (the existing one is left untouched).
    pub fn try_start<F>(&self, conversation: &str, question: Arc<Question>, arm: F) -> Option<u64>
    where
        F: FnOnce(u64) -> Option<AbortHandle>,
    {
        match self.sessions.entry(conversation.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                let timer = arm(id);
                vacant.insert(QuizSession {
                    id,
                    question,
                    timer,
                });
                Some(id)
            }
        }
    }

    /// Remove and return the live session in `conversation`.
    pub fn take(&self, conversation: &str) -> Option<QuizSession> {
        self.sessions.remove(conversation).map(|(_, session)| session)
    }

    /// Remove the session only if it is still session `id`.
    pub fn take_if(&self, conversation: &str, id: u64) -> Option<QuizSession> {
        self.sessions
            .remove_if(conversation, |_, session| session.id == id)
            .map(|(_, session)| session)
    }

    pub fn is_active(&self, conversation: &str) -> bool {
        self.sessions.contains_key(conversation)
    }

    /// Id and question of the live session, if any.
    #[cfg(test)]
    pub fn peek(&self, conversation: &str) -> Option<(u64, Arc<Question>)> {
        self.sessions
            .get(conversation)
            .map(|s| (s.id, Arc::clone(&s.question)))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}
