//! Question Script — the fixed, ordered list of questions a conversation walks.
//!
//! The script is immutable once built. Lookup past the end is not a fault:
//! `get` returns `None` and the controller treats that as "script exhausted".

use serde::Serialize;
use thiserror::Error;

/// How a question is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    FreeText,
    SingleSelect { options: Vec<String> },
}

impl QuestionKind {
    pub fn options(&self) -> Option<&[String]> {
        match self {
            QuestionKind::FreeText => None,
            QuestionKind::SingleSelect { options } => Some(options),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSpec {
    /// Profile field this question fills. Unique across the script.
    pub key: String,
    /// Human title used when restating the answer in the summary.
    pub label: String,
    pub prompt: String,
    pub kind: QuestionKind,
}

impl QuestionSpec {
    pub fn free_text(key: &str, label: &str, prompt: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::FreeText,
        }
    }

    pub fn single_select(key: &str, label: &str, prompt: &str, options: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::SingleSelect {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        }
    }

    pub fn is_free_text(&self) -> bool {
        matches!(self.kind, QuestionKind::FreeText)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Duplicate question key '{0}'")]
    DuplicateKey(String),

    #[error("Question '{0}' is single-select but defines no options")]
    EmptyOptions(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionScript {
    questions: Vec<QuestionSpec>,
}

impl QuestionScript {
    pub fn new(questions: Vec<QuestionSpec>) -> Result<Self, ScriptError> {
        for (i, question) in questions.iter().enumerate() {
            if questions[..i].iter().any(|q| q.key == question.key) {
                return Err(ScriptError::DuplicateKey(question.key.clone()));
            }
            if let Some(options) = question.kind.options() {
                if options.is_empty() {
                    return Err(ScriptError::EmptyOptions(question.key.clone()));
                }
            }
        }
        Ok(Self { questions })
    }

    /// The recruitment intake script.
    pub fn recruitment() -> Result<Self, ScriptError> {
        Self::new(vec![
            QuestionSpec::free_text("name", "Name", "Please tell me your *Name*."),
            QuestionSpec::free_text("email", "Email", "Please provide your *Email address*."),
            QuestionSpec::free_text("phone", "Phone", "Please provide your *Phone Number*."),
            QuestionSpec::free_text("gender", "Gender", "What is your *Gender*?"),
            QuestionSpec::single_select(
                "profileType",
                "Profile Type",
                "Please select your *Profile Type*.",
                &["Student", "Fresher", "Working"],
            ),
            QuestionSpec::single_select(
                "language",
                "Language",
                "Finally, please select a *Language* to continue the conversation.",
                &["English", "Tamil", "Hindi", "French"],
            ),
        ])
    }

    pub fn get(&self, index: usize) -> Option<&QuestionSpec> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionSpec> {
        self.questions.iter()
    }
}
