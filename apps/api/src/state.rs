use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::questionnaire::{ConversationStore, InMemoryConversationStore, Pacer, QuestionScript};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Live conversations. Default: in-memory, nothing survives a restart.
    pub conversations: Arc<dyn ConversationStore>,
    pub pacer: Pacer,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let script = Arc::new(QuestionScript::recruitment()?);
        let conversations = Arc::new(InMemoryConversationStore::new(
            script,
            config.max_conversations,
            Duration::from_secs(config.conversation_ttl_secs),
        ));
        Ok(Self {
            conversations,
            pacer: Pacer::new(Duration::from_millis(config.assistant_delay_ms)),
            config,
        })
    }
}
