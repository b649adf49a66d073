//! Bot module - application state and the Telegram transport.

pub mod dispatcher;
mod outbound;
mod runtime;
mod state;
pub mod webhook;

pub use dispatcher::{ThrottledBot, build_dispatcher};
pub use outbound::TelegramOutbound;
pub use runtime::run;
pub use state::AppState;
