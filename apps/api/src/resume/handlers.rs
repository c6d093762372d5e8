use axum::{extract::Multipart, extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::resume::upload::{validate_upload, UploadReport};
use crate::state::AppState;

/// POST /api/v1/resumes
///
/// Multipart form with one file field. The file is streamed to measure its
/// size and then dropped. Returns 200 with an `accepted` report or 422 with a
/// `rejected` one.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadReport>), AppError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);

        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len() as u64;
        }

        let max_bytes = state.config.max_upload_bytes;
        return Ok(match validate_upload(content_type.as_deref(), size, max_bytes) {
            Ok(()) => {
                info!(?file_name, size, "Resume accepted");
                (StatusCode::OK, Json(UploadReport::accepted(file_name, size)))
            }
            Err(reason) => {
                warn!(?file_name, ?content_type, size, "Resume rejected: {reason}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(UploadReport::rejected(file_name, size, &reason)),
                )
            }
        });
    }

    Err(AppError::Validation(
        "Multipart body must contain a file field".to_string(),
    ))
}
