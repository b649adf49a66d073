//! Persistent chat and user tracking.
//!
//! Two flat identifier sets stored as JSON files under the data directory:
//! tracked conversations (broadcast targets) and users that already got
//! the first-contact welcome.

mod id_set;

use std::path::Path;

pub use id_set::IdSet;

/// Persisted state of the bot.
pub struct Database {
    /// Conversations the bot has seen traffic from.
    pub chats: IdSet,
    /// Direct-chat users that already received the welcome.
    pub users: IdSet,
}

impl Database {
    /// Open (or create on first write) the sets under `data_dir`.
    pub async fn open(data_dir: &Path) -> Self {
        Self {
            chats: IdSet::open("chats", data_dir.join("chats.json")).await,
            users: IdSet::open("users", data_dir.join("users.json")).await,
        }
    }
}
