//! Conversation registry — live conversations keyed by id, held in memory only.
//!
//! `AppState` holds an `Arc<dyn ConversationStore>`. The in-memory backend takes
//! the write lock for the full length of a transition, so a conversation never
//! sees two turns interleave.
//!
//! Conversations idle for longer than the configured TTL, finished or not, are
//! evicted before a new conversation is admitted. Reads do not count as activity.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::questionnaire::controller::{Conversation, TurnOutcome};
use crate::questionnaire::message::ConversationMessage;
use crate::questionnaire::projection::ConversationView;
use crate::questionnaire::script::QuestionScript;

/// A user action forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    FreeText(String),
    SelectOption(String),
}

/// Result of one transition: what happened, the messages it appended, and the
/// conversation as it stands afterwards.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub outcome: TurnOutcome,
    pub emitted: Vec<ConversationMessage>,
    pub view: ConversationView,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Conversation {0} not found")]
    NotFound(Uuid),

    #[error("Conversation limit of {0} reached")]
    Capacity(usize),
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Creates a conversation and runs `start()` on it.
    async fn create(&self) -> Result<TurnResult, StoreError>;

    async fn view(&self, id: Uuid) -> Result<ConversationView, StoreError>;

    async fn apply(&self, id: Uuid, turn: Turn) -> Result<TurnResult, StoreError>;

    /// Drops the conversation and everything collected in it.
    async fn discard(&self, id: Uuid) -> Result<(), StoreError>;

    async fn len(&self) -> usize;
}

#[derive(Debug)]
struct StoredConversation {
    conversation: Conversation,
    last_activity: Instant,
}

#[derive(Debug, Clone)]
pub struct InMemoryConversationStore {
    script: Arc<QuestionScript>,
    capacity: usize,
    ttl: Duration,
    conversations: Arc<RwLock<HashMap<Uuid, StoredConversation>>>,
}

impl InMemoryConversationStore {
    pub fn new(script: Arc<QuestionScript>, capacity: usize, ttl: Duration) -> Self {
        Self {
            script,
            capacity,
            ttl,
            conversations: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Removes every conversation idle for longer than `ttl`.
fn evict_idle(conversations: &mut HashMap<Uuid, StoredConversation>, ttl: Duration) {
    let now = Instant::now();
    conversations.retain(|id, stored| {
        let idle = now.duration_since(stored.last_activity);
        if idle <= ttl {
            return true;
        }
        info!(
            conversation_id = %id,
            completed = stored.conversation.is_completed(),
            idle_secs = idle.as_secs(),
            "Conversation expired"
        );
        false
    });
}

fn run_turn(
    conversation: &mut Conversation,
    step: impl FnOnce(&mut Conversation) -> TurnOutcome,
) -> TurnResult {
    let before = conversation.messages().len();
    let outcome = step(conversation);
    TurnResult {
        outcome,
        emitted: conversation.messages()[before..].to_vec(),
        view: ConversationView::from(&*conversation),
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self) -> Result<TurnResult, StoreError> {
        let mut conversations = self.conversations.write().await;
        evict_idle(&mut conversations, self.ttl);
        if conversations.len() >= self.capacity {
            return Err(StoreError::Capacity(self.capacity));
        }

        let mut conversation = Conversation::new(Arc::clone(&self.script));
        let result = run_turn(&mut conversation, Conversation::start);
        info!(conversation_id = %conversation.id(), "Conversation created");
        conversations.insert(
            conversation.id(),
            StoredConversation {
                conversation,
                last_activity: Instant::now(),
            },
        );
        Ok(result)
    }

    async fn view(&self, id: Uuid) -> Result<ConversationView, StoreError> {
        let conversations = self.conversations.read().await;
        conversations
            .get(&id)
            .map(|stored| ConversationView::from(&stored.conversation))
            .ok_or(StoreError::NotFound(id))
    }

    async fn apply(&self, id: Uuid, turn: Turn) -> Result<TurnResult, StoreError> {
        let mut conversations = self.conversations.write().await;
        let stored = conversations.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        stored.last_activity = Instant::now();
        let conversation = &mut stored.conversation;
        let result = match turn {
            Turn::FreeText(text) => run_turn(conversation, |c| c.submit_free_text(&text)),
            Turn::SelectOption(option) => run_turn(conversation, |c| c.select_option(&option)),
        };
        Ok(result)
    }

    async fn discard(&self, id: Uuid) -> Result<(), StoreError> {
        let removed = self.conversations.write().await.remove(&id);
        match removed {
            Some(stored) => {
                info!(
                    conversation_id = %id,
                    completed = stored.conversation.is_completed(),
                    "Conversation discarded"
                );
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }
}
