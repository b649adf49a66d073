//! Non-command message handling.
//!
//! - `antiflood` - per-sender command rate limiting
//! - `welcome` - first-contact greeting in direct chats
//! - `ambient` - occasional supplication replies to Arabic text

pub mod ambient;
pub mod antiflood;
pub mod welcome;

pub use antiflood::RateLimiter;
