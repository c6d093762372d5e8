// Guided questionnaire: a fixed script of questions asked as a chat,
// with per-field validation and a closing summary.
// All state lives in memory and is dropped when the user leaves.

pub mod answers;
pub mod controller;
pub mod handlers;
pub mod message;
pub mod pacing;
pub mod projection;
pub mod script;
pub mod store;
pub mod validation;

pub use pacing::Pacer;
pub use script::QuestionScript;
pub use store::{ConversationStore, InMemoryConversationStore};
