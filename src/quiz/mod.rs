//! Quiz trivia: question pool, per-conversation sessions and the state
//! machine that ties them to timers.
//!
//! ```text
//! NONE --start--> ACTIVE --answer 1/2/3--> ANSWERED --> NONE
//!                   \------timer fires----> EXPIRED ---> NONE
//! ```

mod bank;
mod engine;
mod session;

pub use bank::{Question, QuestionBank};
pub use engine::QuizEngine;
pub use session::SessionStore;

#[cfg(test)]
pub use bank::Answer;
