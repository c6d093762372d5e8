use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-conversation message id. Creation order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    Assistant,
    User,
}

/// Immutable once appended to a conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationMessage {
    pub id: MessageId,
    pub author: Author,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only message log that hands out monotonically increasing ids.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<ConversationMessage>,
    next_id: u64,
}

impl MessageLog {
    pub fn push(&mut self, author: Author, text: impl Into<String>) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);
        self.messages.push(ConversationMessage {
            id,
            author,
            text: text.into(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn as_slice(&self) -> &[ConversationMessage] {
        &self.messages
    }
}
