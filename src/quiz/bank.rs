//! Quiz question pool.

use std::path::Path;
use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Number of choices every quiz question offers.
pub const CHOICES: usize = 3;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse question file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One answer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    #[serde(default, alias = "isCorrect")]
    pub correct: bool,
}

/// A question with its answers in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(alias = "prompt")]
    pub question: String,
    pub answers: Vec<Answer>,
}

impl Question {
    /// Zero-based position of the correct answer in display order.
    pub fn correct_index(&self) -> Option<usize> {
        self.answers.iter().position(|a| a.correct)
    }

    fn is_playable(&self) -> bool {
        self.answers.len() == CHOICES && self.answers.iter().filter(|a| a.correct).count() == 1
    }
}

/// Loaded question pool. Immutable after load.
#[derive(Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Arc<Question>>,
}

impl QuestionBank {
    /// Build a bank, skipping questions that cannot be played.
    pub fn from_questions(questions: Vec<Question>) -> Self {
        let total = questions.len();
        let questions: Vec<Arc<Question>> = questions
            .into_iter()
            .filter(|q| {
                let ok = q.is_playable();
                if !ok {
                    warn!(
                        "Skipping quiz question without {} answers and a single correct one: {:?}",
                        CHOICES, q.question
                    );
                }
                ok
            })
            .map(Arc::new)
            .collect();

        if questions.len() < total {
            warn!("Loaded {} of {} quiz questions", questions.len(), total);
        }

        Self { questions }
    }

    /// Load questions from a JSON array file.
    pub async fn load(path: &Path) -> Result<Self, BankError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| BankError::Read {
                path: path.display().to_string(),
                source,
            })?;

        let questions: Vec<Question> =
            serde_json::from_str(&raw).map_err(|source| BankError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let bank = Self::from_questions(questions);
        info!("Quiz bank loaded: {} questions", bank.len());
        Ok(bank)
    }

    /// Uniformly random question.
    pub fn random(&self) -> Option<Arc<Question>> {
        self.questions.choose(&mut rand::thread_rng()).cloned()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}
