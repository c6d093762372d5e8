pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::questionnaire::handlers;
use crate::resume::handlers as resume_handlers;
use crate::state::AppState;

/// Room for multipart framing on top of the largest accepted file.
const UPLOAD_BODY_SLACK: u64 = 1024 * 1024;

/// Request body cap for the upload route. Saturates instead of wrapping.
fn upload_body_limit(max_upload_bytes: u64) -> usize {
    let limit = max_upload_bytes.saturating_add(UPLOAD_BODY_SLACK);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

pub fn build_router(state: AppState) -> Router {
    let upload_body_limit = upload_body_limit(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Conversation API
        .route("/api/v1/conversations", post(handlers::handle_start))
        .route(
            "/api/v1/conversations/:id",
            get(handlers::handle_get_conversation).delete(handlers::handle_leave),
        )
        .route(
            "/api/v1/conversations/:id/answer",
            post(handlers::handle_answer),
        )
        .route(
            "/api/v1/conversations/:id/select",
            post(handlers::handle_select),
        )
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resume_handlers::handle_upload).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    fn app() -> Router {
        build_router(AppState::new(Config::default()).unwrap())
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn multipart(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "recruit-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn start(app: &Router) -> String {
        let (status, body) = send(app, empty("POST", "/api/v1/conversations")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["outcome"], "started");
        body["conversation"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), empty("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "recruit-api");
        assert_eq!(body["active_conversations"], 0);
    }

    #[tokio::test]
    async fn test_health_counts_conversations() {
        let app = app();
        start(&app).await;
        start(&app).await;
        let (_, body) = send(&app, empty("GET", "/health")).await;
        assert_eq!(body["active_conversations"], 2);
    }

    #[tokio::test]
    async fn test_full_questionnaire_over_http() {
        let app = app();
        let id = start(&app).await;
        let answer = format!("/api/v1/conversations/{id}/answer");
        let select = format!("/api/v1/conversations/{id}/select");

        for text in ["Ada", "a@b.com", "1234567890", "F"] {
            let (status, body) = send(&app, post_json(&answer, json!({ "text": text }))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["outcome"], "advanced");
        }

        let (_, body) = send(&app, post_json(&select, json!({ "option": "Student" }))).await;
        assert_eq!(body["outcome"], "advanced");
        assert_eq!(body["next_key"], "language");
        assert_eq!(body["conversation"]["pending_input"]["type"], "options");

        let (_, body) = send(&app, post_json(&select, json!({ "option": "English" }))).await;
        assert_eq!(body["outcome"], "completed");
        assert_eq!(body["conversation"]["completed"], true);
        assert_eq!(body["conversation"]["answers"]["profileType"], "Student");
        let summary = body["emitted"][1]["text"].as_str().unwrap();
        for value in ["Ada", "a@b.com", "1234567890", "F", "Student", "English"] {
            assert!(summary.contains(value));
        }

        let (_, body) = send(&app, post_json(&answer, json!({ "text": "again" }))).await;
        assert_eq!(body["outcome"], "ignored");
        assert_eq!(body["reason"], "already_completed");
    }

    #[tokio::test]
    async fn test_invalid_answer_is_reasked() {
        let app = app();
        let id = start(&app).await;
        let answer = format!("/api/v1/conversations/{id}/answer");

        send(&app, post_json(&answer, json!({ "text": "Ada" }))).await;
        let (status, body) = send(&app, post_json(&answer, json!({ "text": "ab.com" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "reasked");
        assert_eq!(body["reason"], "malformed_email");
        assert_eq!(body["emitted"][0]["author"], "user");
        assert_eq!(body["emitted"][0]["text"], "ab.com");
        assert_eq!(body["conversation"]["pending_input"]["key"], "email");
    }

    #[tokio::test]
    async fn test_option_on_free_text_question_is_ignored() {
        let app = app();
        let id = start(&app).await;
        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/conversations/{id}/select"),
                json!({ "option": "Student" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "ignored");
        assert_eq!(body["reason"], "wrong_input_kind");
        assert_eq!(body["emitted"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_untrusted_option_is_ignored() {
        let app = app();
        let id = start(&app).await;
        let answer = format!("/api/v1/conversations/{id}/answer");
        let select = format!("/api/v1/conversations/{id}/select");
        for text in ["Ada", "a@b.com", "1234567890", "F"] {
            send(&app, post_json(&answer, json!({ "text": text }))).await;
        }

        let (status, body) = send(&app, post_json(&select, json!({ "option": "Retired" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "ignored");
        assert_eq!(body["reason"], "untrusted_option_value");
        assert_eq!(body["emitted"].as_array().unwrap().len(), 0);
        assert_eq!(body["conversation"]["pending_input"]["key"], "profileType");
        assert!(body["conversation"]["answers"].get("profileType").is_none());
    }

    #[tokio::test]
    async fn test_leave_discards_conversation() {
        let app = app();
        let id = start(&app).await;
        let uri = format!("/api/v1/conversations/{id}");

        let (status, body) = send(&app, empty("GET", &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);

        let (status, _) = send(&app, empty("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, empty("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_capacity_reached() {
        let config = Config {
            max_conversations: 1,
            ..Config::default()
        };
        let app = build_router(AppState::new(config).unwrap());
        start(&app).await;
        let (status, body) = send(&app, empty("POST", "/api/v1/conversations")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "CAPACITY_REACHED");
    }

    #[tokio::test]
    async fn test_resume_upload_accepted() {
        let (status, body) = send(&app(), multipart("cv.pdf", "application/pdf", b"%PDF-1.4 test")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "accepted");
        assert_eq!(body["file_name"], "cv.pdf");
        assert_eq!(body["size_bytes"], 13);
    }

    #[tokio::test]
    async fn test_resume_upload_wrong_type() {
        let (status, body) = send(&app(), multipart("cv.png", "image/png", b"png")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["description"], "Please upload a PDF, DOC, or DOCX file.");
    }

    #[tokio::test]
    async fn test_resume_upload_too_large() {
        let config = Config {
            max_upload_bytes: 8,
            ..Config::default()
        };
        let app = build_router(AppState::new(config).unwrap());
        let (status, body) = send(&app, multipart("cv.pdf", "application/pdf", &[b'x'; 32])).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["size_bytes"], 32);
        assert_eq!(body["description"], "File size must be less than 8 bytes.");
    }

    #[test]
    fn test_upload_body_limit_saturates() {
        assert_eq!(upload_body_limit(0), 1024 * 1024);
        assert_eq!(upload_body_limit(u64::MAX), usize::MAX);
    }

    #[tokio::test]
    async fn test_resume_upload_with_unbounded_limit() {
        let config = Config {
            max_upload_bytes: u64::MAX,
            ..Config::default()
        };
        let app = build_router(AppState::new(config).unwrap());
        let (status, body) = send(&app, multipart("cv.pdf", "application/pdf", b"%PDF-1.4 test")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "accepted");
    }

    #[tokio::test]
    async fn test_resume_upload_without_file() {
        let boundary = "b";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resumes")
            .header("content-type", format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(&app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
