use std::time::Duration;

use crate::questionnaire::message::{Author, ConversationMessage};

/// Cosmetic "typing" delay applied after a transition has committed.
/// A zero delay is valid and changes nothing observable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pacer {
    per_message: Duration,
}

impl Pacer {
    pub fn new(per_message: Duration) -> Self {
        Self { per_message }
    }

    /// Sleeps once per assistant message in `emitted`. Dropping the future
    /// (e.g. the client disconnects) cancels the wait and nothing else.
    pub async fn pause(&self, emitted: &[ConversationMessage]) {
        let delay = self.delay_for(emitted);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn delay_for(&self, emitted: &[ConversationMessage]) -> Duration {
        let assistant = emitted
            .iter()
            .filter(|m| m.author == Author::Assistant)
            .count() as u32;
        self.per_message * assistant
    }
}
