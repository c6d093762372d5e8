use serde::Serialize;
use thiserror::Error;

/// Minimum length of an accepted phone answer, counted over the whole trimmed input.
pub const PHONE_MIN_CHARS: usize = 10;

/// Structural validation failure for a free-text answer.
/// The display string is the guidance message shown to the user on re-ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerError {
    #[error("Please provide a valid email address (e.g., john@example.com).")]
    MalformedEmail,

    #[error("Please provide a valid phone number with at least 10 digits.")]
    MalformedPhone,
}

/// Validates a trimmed, non-empty free-text answer for the question `key`.
///
/// Only `email` and `phone` carry structural rules; every other key accepts
/// any non-empty text.
pub fn validate_answer(key: &str, answer: &str) -> Result<(), AnswerError> {
    match key {
        "email" if !is_valid_email(answer) => Err(AnswerError::MalformedEmail),
        "phone" if !is_valid_phone(answer) => Err(AnswerError::MalformedPhone),
        _ => Ok(()),
    }
}

/// `local@domain.tld` shape:
/// - exactly one `@`, no whitespace anywhere
/// - non-empty local part
/// - domain contains a `.` with at least one character on each side
pub fn is_valid_email(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Digits, whitespace, `+`, `-`, `(`, `)` only, and at least [`PHONE_MIN_CHARS`] long.
pub fn is_valid_phone(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.chars().count() >= PHONE_MIN_CHARS
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '-' | '(' | ')'))
}
