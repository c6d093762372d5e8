//! Read-only view of a conversation for the rendering layer.
//!
//! Nothing here mutates a `Conversation`; handlers serialize `ConversationView`
//! straight into responses.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::questionnaire::answers::ProfileAnswers;
use crate::questionnaire::controller::{Conversation, ConversationPhase};
use crate::questionnaire::message::ConversationMessage;
use crate::questionnaire::script::QuestionKind;

/// What the presentation layer should offer for the next user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PendingInput {
    FreeText { key: String },
    Options { key: String, options: Vec<String> },
    /// Not started yet, or completed.
    None,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    pub id: Uuid,
    pub phase: ConversationPhase,
    pub messages: Vec<ConversationMessage>,
    pub pending_input: PendingInput,
    pub answers: ProfileAnswers,
    /// Index of the question awaiting an answer; equals `total_questions` once done.
    pub cursor: usize,
    pub total_questions: usize,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Messages in display order. Tolerates an empty log.
pub fn render_log(messages: &[ConversationMessage]) -> Vec<ConversationMessage> {
    let mut ordered = messages.to_vec();
    ordered.sort_by_key(|m| m.id);
    ordered
}

pub fn pending_input(conversation: &Conversation) -> PendingInput {
    match conversation.current_question() {
        Some(question) => match &question.kind {
            QuestionKind::FreeText => PendingInput::FreeText {
                key: question.key.clone(),
            },
            QuestionKind::SingleSelect { options } => PendingInput::Options {
                key: question.key.clone(),
                options: options.clone(),
            },
        },
        None => PendingInput::None,
    }
}

impl From<&Conversation> for ConversationView {
    fn from(conversation: &Conversation) -> Self {
        let phase = conversation.phase();
        Self {
            id: conversation.id(),
            phase,
            messages: render_log(conversation.messages()),
            pending_input: pending_input(conversation),
            answers: conversation.answers().clone(),
            cursor: conversation.cursor(),
            total_questions: conversation.script().len(),
            completed: phase.is_terminal(),
            created_at: conversation.created_at(),
        }
    }
}
