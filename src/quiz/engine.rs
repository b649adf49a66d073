//! Quiz state machine: start, answer and expiry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{Question, QuestionBank, SessionStore};
use crate::i18n::get_text;
use crate::router::{Outbound, OutboundMessage};

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started(u64),
    /// A quiz is already live in the conversation.
    Pending,
    NoQuestions,
}

/// Result of a consumed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub chosen: usize,
    pub correct: usize,
}

impl AnswerOutcome {
    pub fn is_correct(&self) -> bool {
        self.chosen == self.correct
    }
}

/// Parse an answer token: exactly "1", "2" or "3" after trimming.
/// Returns the zero-based choice.
pub fn parse_answer(text: &str) -> Option<usize> {
    match text.trim() {
        "1" => Some(0),
        "2" => Some(1),
        "3" => Some(2),
        _ => None,
    }
}

/// Drives quiz sessions for all conversations.
pub struct QuizEngine {
    store: Arc<SessionStore>,
    bank: Arc<QuestionBank>,
    outbound: Arc<dyn Outbound>,
    timeout: Duration,
    lang: String,
}

impl QuizEngine {
    pub fn new(
        store: Arc<SessionStore>,
        bank: Arc<QuestionBank>,
        outbound: Arc<dyn Outbound>,
        timeout: Duration,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bank,
            outbound,
            timeout,
            lang: lang.into(),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    pub fn is_active(&self, conversation: &str) -> bool {
        self.store.is_active(conversation)
    }

    /// Start a quiz in `conversation` and post the question.
    pub async fn start(
        &self,
        conversation: &str,
        quoted: Option<&str>,
    ) -> anyhow::Result<StartOutcome> {
        let Some(question) = self.bank.random() else {
            self.send(conversation, get_text(&self.lang, "quiz.no_questions"), quoted)
                .await?;
            return Ok(StartOutcome::NoQuestions);
        };

        let started = self
            .store
            .try_start(conversation, Arc::clone(&question), |id| {
                Some(self.arm_timer(conversation, id))
            });

        let Some(id) = started else {
            debug!("Quiz already pending in {}", conversation);
            self.send(conversation, get_text(&self.lang, "quiz.pending"), quoted)
                .await?;
            return Ok(StartOutcome::Pending);
        };

        info!("Quiz {} started in {}", id, conversation);
        let prompt = render_question(&question, &self.lang, self.timeout);
        self.send(conversation, prompt, quoted).await?;

        Ok(StartOutcome::Started(id))
    }

    /// Consume `text` as an answer if it is one and a quiz is live.
    ///
    /// Returns `None` when the text was not consumed and should be handled
    /// as a normal message.
    pub async fn try_answer(
        &self,
        conversation: &str,
        text: &str,
        quoted: Option<&str>,
    ) -> anyhow::Result<Option<AnswerOutcome>> {
        let Some(chosen) = parse_answer(text) else {
            return Ok(None);
        };

        // Removed before any await so the expiry timer cannot act on it too.
        let Some(session) = self.store.take(conversation) else {
            return Ok(None);
        };
        session.cancel_timer();

        let Some(correct) = session.question.correct_index() else {
            warn!("Quiz {} had no correct answer", session.id);
            return Ok(None);
        };

        let outcome = AnswerOutcome { chosen, correct };
        info!(
            "Quiz {} answered in {}: chose {}, correct {}",
            session.id,
            conversation,
            chosen + 1,
            correct + 1
        );

        let key = if outcome.is_correct() {
            "quiz.correct"
        } else {
            "quiz.wrong"
        };
        let report = render_report(&self.lang, key, &session.question, correct);
        self.send(conversation, report, quoted).await?;

        Ok(Some(outcome))
    }

    fn arm_timer(&self, conversation: &str, id: u64) -> tokio::task::AbortHandle {
        let store = Arc::clone(&self.store);
        let outbound = Arc::clone(&self.outbound);
        let lang = self.lang.clone();
        let timeout = self.timeout;
        let conversation = conversation.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            expire(&store, outbound.as_ref(), &lang, &conversation, id).await;
        })
        .abort_handle()
    }

    async fn send(
        &self,
        conversation: &str,
        text: String,
        quoted: Option<&str>,
    ) -> anyhow::Result<()> {
        self.outbound
            .send(conversation, OutboundMessage::Text(text), quoted)
            .await
    }
}

/// Expiry path. No-op when the session was already answered or replaced.
async fn expire(
    store: &SessionStore,
    outbound: &dyn Outbound,
    lang: &str,
    conversation: &str,
    id: u64,
) {
    let Some(session) = store.take_if(conversation, id) else {
        debug!("Quiz {} timer fired after the session ended", id);
        return;
    };

    info!("Quiz {} expired in {}", id, conversation);

    let Some(correct) = session.question.correct_index() else {
        return;
    };

    let report = render_report(lang, "quiz.timeout", &session.question, correct);
    if let Err(e) = outbound
        .send(conversation, OutboundMessage::Text(report), None)
        .await
    {
        warn!("Failed to send quiz timeout for {}: {}", conversation, e);
    }
}

fn render_question(question: &Question, lang: &str, timeout: Duration) -> String {
    let choices: Vec<String> = question
        .answers
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{}. {}", i + 1, a.text))
        .collect();

    format!(
        "{}\n\n{}\n\n{}\n\n{}",
        get_text(lang, "quiz.header"),
        question.question,
        choices.join("\n"),
        get_text(lang, "quiz.hint").replace("{secs}", &timeout.as_secs().to_string()),
    )
}

/// Report naming the correct answer by its 1-based display position.
fn render_report(lang: &str, key: &str, question: &Question, correct: usize) -> String {
    get_text(lang, key)
        .replace("{number}", &(correct + 1).to_string())
        .replace("{answer}", &question.answers[correct].text)
}
