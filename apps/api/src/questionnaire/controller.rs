//! Conversation Controller — owns one questionnaire run and drives its transitions.
//!
//! Every public operation runs synchronously to completion: when it returns,
//! `messages`, `cursor`, `answers` and `completed` are all consistent. Display
//! pacing lives outside this type (see `pacing`).
//!
//! Invariants held after every operation:
//! - `answers.len() == cursor`
//! - `completed` iff `cursor == script.len()` and the summary has been emitted
//! - once completed, no operation mutates state

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::questionnaire::answers::ProfileAnswers;
use crate::questionnaire::message::{Author, ConversationMessage, MessageLog};
use crate::questionnaire::script::{QuestionKind, QuestionScript, QuestionSpec};
use crate::questionnaire::validation::{validate_answer, AnswerError};

pub const GREETING: &str = "Hello! I'm your recruitment assistant. I'll ask you a few questions to get to know you better. Let's start!";

const SUMMARY_HEADER: &str =
    "Thank you for providing all the information! Here's what I have collected:";
const SUMMARY_FOOTER: &str = "Is this information correct? Our recruitment team will review your details and get back to you soon!";

// ────────────────────────────────────────────────────────────────────────────
// Phase machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "index", rename_all = "snake_case")]
pub enum ConversationPhase {
    Greeting,
    AwaitingAnswer(usize),
    Completed,
}

impl ConversationPhase {
    /// `script_len` is needed to tell the last question apart from the others.
    pub fn can_transition_to(&self, target: &Self, script_len: usize) -> bool {
        use ConversationPhase::*;
        match (self, target) {
            (Greeting, AwaitingAnswer(0)) => script_len > 0,
            (Greeting, Completed) => script_len == 0,
            // re-ask keeps the same index; a valid answer moves to the next one
            (AwaitingAnswer(i), AwaitingAnswer(j)) => *j == *i || (*j == i + 1 && *j < script_len),
            (AwaitingAnswer(i), Completed) => i + 1 == script_len,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationPhase::Completed)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Turn outcomes
// ────────────────────────────────────────────────────────────────────────────

/// Why a turn did not advance the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    EmptyInput,
    MalformedEmail,
    MalformedPhone,
    UntrustedOptionValue,
    WrongInputKind,
    NotStarted,
    AlreadyStarted,
    AlreadyCompleted,
}

impl From<AnswerError> for RejectReason {
    fn from(err: AnswerError) -> Self {
        match err {
            AnswerError::MalformedEmail => RejectReason::MalformedEmail,
            AnswerError::MalformedPhone => RejectReason::MalformedPhone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Greeting emitted and the first question asked.
    Started,
    /// Answer recorded; `next_key` is now awaiting an answer.
    Advanced { next_key: String },
    /// Last answer recorded and the summary emitted.
    Completed,
    /// Input logged but failed validation; the same question stays current.
    Reasked { reason: RejectReason },
    /// Nothing changed.
    Ignored { reason: RejectReason },
}

// ────────────────────────────────────────────────────────────────────────────
// Conversation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Conversation {
    id: Uuid,
    script: Arc<QuestionScript>,
    messages: MessageLog,
    cursor: usize,
    answers: ProfileAnswers,
    started: bool,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(script: Arc<QuestionScript>) -> Self {
        Self {
            id: Uuid::new_v4(),
            script,
            messages: MessageLog::default(),
            cursor: 0,
            answers: ProfileAnswers::default(),
            started: false,
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn script(&self) -> &QuestionScript {
        &self.script
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        self.messages.as_slice()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn answers(&self) -> &ProfileAnswers {
        &self.answers
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn phase(&self) -> ConversationPhase {
        if self.completed {
            ConversationPhase::Completed
        } else if !self.started {
            ConversationPhase::Greeting
        } else {
            ConversationPhase::AwaitingAnswer(self.cursor)
        }
    }

    /// The question awaiting an answer, if the conversation is running.
    pub fn current_question(&self) -> Option<&QuestionSpec> {
        match self.phase() {
            ConversationPhase::AwaitingAnswer(i) => self.script.get(i),
            _ => None,
        }
    }

    /// Emits the greeting, then the first prompt (or the summary for an empty script).
    pub fn start(&mut self) -> TurnOutcome {
        if self.started {
            return TurnOutcome::Ignored {
                reason: RejectReason::AlreadyStarted,
            };
        }
        self.started = true;
        self.messages.push(Author::Assistant, GREETING);
        debug!(conversation_id = %self.id, "Conversation started");

        match self.script.get(0) {
            Some(first) => {
                self.messages.push(Author::Assistant, first.prompt.clone());
                TurnOutcome::Started
            }
            None => self.complete(),
        }
    }

    /// Answers the current free-text question.
    pub fn submit_free_text(&mut self, input: &str) -> TurnOutcome {
        if let Some(reason) = self.closed_reason() {
            return TurnOutcome::Ignored { reason };
        }
        let answer = input.trim();
        if answer.is_empty() {
            return TurnOutcome::Ignored {
                reason: RejectReason::EmptyInput,
            };
        }

        let script = Arc::clone(&self.script);
        let Some(question) = script.get(self.cursor) else {
            return TurnOutcome::Ignored {
                reason: RejectReason::AlreadyCompleted,
            };
        };
        if !question.is_free_text() {
            debug!(
                conversation_id = %self.id,
                key = %question.key,
                "Free-text submitted to a single-select question"
            );
            return TurnOutcome::Ignored {
                reason: RejectReason::WrongInputKind,
            };
        }

        // Logged before validation so rejected input stays visible.
        self.messages.push(Author::User, answer);

        if let Err(err) = validate_answer(&question.key, answer) {
            debug!(conversation_id = %self.id, key = %question.key, "Answer rejected: {err:?}");
            self.messages.push(Author::Assistant, err.to_string());
            return TurnOutcome::Reasked { reason: err.into() };
        }

        self.advance(question, answer)
    }

    /// Answers the current single-select question. `option` must be one of the
    /// question's options verbatim; anything else is ignored.
    pub fn select_option(&mut self, option: &str) -> TurnOutcome {
        if let Some(reason) = self.closed_reason() {
            return TurnOutcome::Ignored { reason };
        }

        let script = Arc::clone(&self.script);
        let Some(question) = script.get(self.cursor) else {
            return TurnOutcome::Ignored {
                reason: RejectReason::AlreadyCompleted,
            };
        };
        let options = match &question.kind {
            QuestionKind::SingleSelect { options } => options,
            QuestionKind::FreeText => {
                return TurnOutcome::Ignored {
                    reason: RejectReason::WrongInputKind,
                }
            }
        };
        if !options.iter().any(|o| o == option) {
            warn!(
                conversation_id = %self.id,
                key = %question.key,
                option,
                "Option is not offered by the current question; ignoring"
            );
            return TurnOutcome::Ignored {
                reason: RejectReason::UntrustedOptionValue,
            };
        }

        self.messages.push(Author::User, option);
        self.advance(question, option)
    }

    fn closed_reason(&self) -> Option<RejectReason> {
        match self.phase() {
            ConversationPhase::Completed => Some(RejectReason::AlreadyCompleted),
            ConversationPhase::Greeting => Some(RejectReason::NotStarted),
            ConversationPhase::AwaitingAnswer(_) => None,
        }
    }

    fn advance(&mut self, question: &QuestionSpec, answer: &str) -> TurnOutcome {
        let from = self.phase();
        // cursor only moves forward past recorded keys, so this never collides
        self.answers.record(&question.key, answer);
        self.cursor += 1;
        debug_assert_eq!(self.answers.len(), self.cursor);

        let outcome = match self.script.get(self.cursor) {
            Some(next) => {
                let next_key = next.key.clone();
                self.messages.push(Author::Assistant, next.prompt.clone());
                TurnOutcome::Advanced { next_key }
            }
            None => self.complete(),
        };
        debug_assert!(from.can_transition_to(&self.phase(), self.script.len()));
        outcome
    }

    /// Summary is built only from `answers` after the final answer is recorded.
    fn complete(&mut self) -> TurnOutcome {
        let summary = render_summary(&self.script, &self.answers);
        self.messages.push(Author::Assistant, summary);
        self.completed = true;
        info!(
            conversation_id = %self.id,
            answers = self.answers.len(),
            "Questionnaire completed"
        );
        TurnOutcome::Completed
    }
}

/// Restates every collected answer in script order, one `Label: value` line each.
/// Lines carry the human label; the raw keys only appear in `ProfileAnswers`.
pub fn render_summary(script: &QuestionScript, answers: &ProfileAnswers) -> String {
    let mut lines = vec![SUMMARY_HEADER.to_string(), String::new()];
    for question in script.iter() {
        if let Some(value) = answers.get(&question.key) {
            lines.push(format!("{}: {}", question.label, value));
        }
    }
    lines.push(String::new());
    lines.push(SUMMARY_FOOTER.to_string());
    lines.join("\n")
}
