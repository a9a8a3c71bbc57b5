use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use feedback::{FeedbackOverview, StoreError, SubmissionRecord, SubmissionRow, SubmitError, RETRY_MESSAGE};

use crate::state::SharedState;

type ApiError = (StatusCode, Json<serde_json::Value>);

pub const INVALID_BODY_MESSAGE: &str = "Please send a JSON body with a numeric rating (1-5) and a review.";

#[derive(Deserialize)]
pub struct SubmitReq {
    pub rating: i64,
    pub review: String,
}

pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/feedback", post(post_feedback))
        .route("/admin/overview", get(get_overview))
        .route("/admin/submissions", get(get_submissions))
        .route("/admin/submissions/:position", get(get_submission))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

pub async fn post_feedback(
    State(state): State<SharedState>,
    payload: Result<Json<SubmitReq>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("feedback: malformed request body: {}", rejection.body_text());
        (rejection.status(), Json(json!({"error": INVALID_BODY_MESSAGE})))
    })?;

    match state.feedback.submit(req.rating, &req.review).await {
        Ok(reply) => Ok((StatusCode::CREATED, Json(json!({"response": reply})))),
        Err(e @ SubmitError::Validation(_)) => {
            warn!("feedback: rejected input: {e}");
            Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"error": e.user_message()}))))
        }
        Err(e) => {
            error!("feedback: submission failed: {e}");
            let status = match &e {
                SubmitError::Generation(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(json!({"error": e.user_message()}))))
        }
    }
}

pub async fn get_overview(State(state): State<SharedState>) -> Result<Json<FeedbackOverview>, ApiError> {
    state.feedback.overview().await.map(Json).map_err(storage_failure)
}

pub async fn get_submissions(State(state): State<SharedState>) -> Result<Json<Vec<SubmissionRow>>, ApiError> {
    state.feedback.submissions().await.map(Json).map_err(storage_failure)
}

pub async fn get_submission(
    State(state): State<SharedState>,
    Path(position): Path<usize>,
) -> Result<Json<SubmissionRecord>, ApiError> {
    state
        .feedback
        .submission(position)
        .await
        .map_err(storage_failure)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, Json(json!({"error": "Submission not found"}))))
}

fn storage_failure(e: StoreError) -> ApiError {
    error!("admin: reading submissions failed: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": RETRY_MESSAGE})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use feedback::{FeedbackConfig, FeedbackService, SubmissionStore};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use textgen::{GenerationError, GeneratorInfo, TextGenerator};
    use tower::ServiceExt;

    struct Canned {
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _prompt: &str, temperature: f32) -> textgen::Result<String> {
            if self.fail {
                return Err(GenerationError::Transport("connection refused".into()));
            }
            Ok(format!("generated at {temperature}"))
        }

        fn info(&self) -> GeneratorInfo {
            GeneratorInfo { name: "canned".into(), base_url: String::new(), model: String::new() }
        }
    }

    fn app_with_store(store: SubmissionStore, fail: bool) -> Router {
        let svc = FeedbackService::new(Arc::new(Canned { fail }), store, FeedbackConfig::default());
        app(Arc::new(crate::state::AppState::new(svc)))
    }

    fn test_app(fail: bool) -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SubmissionStore::new(dir.path().join("submissions.csv"));
        store.initialize().unwrap();
        (app_with_store(store, fail), dir)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_submit_then_admin_views() {
        let (app, _dir) = test_app(false);

        let (status, body) = call(&app, "POST", "/feedback", Some(json!({"rating": 5, "review": "Great service today"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["response"], "generated at 0.4");

        let (status, body) = call(&app, "GET", "/admin/overview", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_submissions"], 1);
        assert_eq!(body["average_rating"], 5.0);
        assert_eq!(body["low_ratings"], 0);

        let (_, body) = call(&app, "GET", "/admin/submissions", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["position"], 1);

        let (status, body) = call(&app, "GET", "/admin/submissions/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ai_summary"], "generated at 0.2");
        assert_eq!(body["ai_recommended_action"], "generated at 0.3");

        let (status, _) = call(&app, "GET", "/admin/submissions/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validation_error_is_422_with_message() {
        let (app, _dir) = test_app(false);
        let (status, body) = call(&app, "POST", "/feedback", Some(json!({"rating": 0, "review": "ok"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("1-5"));

        let (_, body) = call(&app, "GET", "/admin/overview", None).await;
        assert_eq!(body["total_submissions"], 0);
        assert!(body["average_rating"].is_null());
    }

    #[tokio::test]
    async fn test_generation_failure_hides_internal_error() {
        let (app, _dir) = test_app(true);
        let (status, body) = call(&app, "POST", "/feedback", Some(json!({"rating": 3, "review": "Just okay overall"}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], RETRY_MESSAGE);
        assert!(!body.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_storage_failure_is_500_with_generic_message() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file").unwrap();
        let app = app_with_store(SubmissionStore::new(blocker.join("submissions.csv")), false);

        let (status, body) = call(&app, "POST", "/feedback", Some(json!({"rating": 4, "review": "Lovely staff, quick service"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": RETRY_MESSAGE}));
        assert!(!body.to_string().contains("IO"));
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error() {
        let (app, _dir) = test_app(false);
        let (status, body) = call(&app, "POST", "/feedback", Some(json!({"rating": "5", "review": "Great service today"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"error": INVALID_BODY_MESSAGE}));

        let (_, body) = call(&app, "GET", "/admin/overview", None).await;
        assert_eq!(body["total_submissions"], 0);
    }
}
