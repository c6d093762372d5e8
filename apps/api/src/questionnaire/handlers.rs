//! Axum route handlers for the Conversation API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::questionnaire::controller::TurnOutcome;
use crate::questionnaire::message::ConversationMessage;
use crate::questionnaire::projection::ConversationView;
use crate::questionnaire::store::{Turn, TurnResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub option: String,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    #[serde(flatten)]
    pub outcome: TurnOutcome,
    /// Messages appended by this turn, in order.
    pub emitted: Vec<ConversationMessage>,
    pub conversation: ConversationView,
}

impl From<TurnResult> for TurnResponse {
    fn from(result: TurnResult) -> Self {
        Self {
            outcome: result.outcome,
            emitted: result.emitted,
            conversation: result.view,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/conversations
///
/// Opens a conversation: greeting plus the first question.
pub async fn handle_start(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TurnResponse>), AppError> {
    let result = state.conversations.create().await?;
    state.pacer.pause(&result.emitted).await;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// GET /api/v1/conversations/:id
pub async fn handle_get_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationView>, AppError> {
    Ok(Json(state.conversations.view(id).await?))
}

/// POST /api/v1/conversations/:id/answer
///
/// Free-text answer for the current question. Validation failures come back
/// as a `reasked` outcome with a guidance message in `emitted`, not as an error.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let result = state
        .conversations
        .apply(id, Turn::FreeText(request.text))
        .await?;
    state.pacer.pause(&result.emitted).await;
    Ok(Json(result.into()))
}

/// POST /api/v1/conversations/:id/select
pub async fn handle_select(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let result = state
        .conversations
        .apply(id, Turn::SelectOption(request.option))
        .await?;
    state.pacer.pause(&result.emitted).await;
    Ok(Json(result.into()))
}

/// DELETE /api/v1/conversations/:id
///
/// "Leave conversation" signal. Collected answers are discarded.
pub async fn handle_leave(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.conversations.discard(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
