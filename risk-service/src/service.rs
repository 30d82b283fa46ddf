use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
};
use risk_flow::{
    ClientConfig, InMemorySessionStorage, RiskError, SessionStorage, SubmissionRunner,
    SubmitOutcome, fields,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::models::{CreateSessionResponse, SubmitResponse, UpdateFieldRequest};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn map_risk_error(e: RiskError) -> ApiError {
    match e {
        RiskError::UnknownField(name) => bad_request_error(&format!("Unknown field: {}", name)),
        RiskError::SessionNotFound(id) => not_found_error("Session not found", &id),
        other => {
            error!("Session operation failed: {}", other);
            internal_error("Session operation failed", &other.to_string())
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub runner: SubmissionRunner,
}

pub fn create_app(config: &ClientConfig) -> Router {
    let session_storage: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let runner = SubmissionRunner::from_config(config, session_storage);
    build_router(AppState { runner })
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/fields", get(list_fields))
        .route("/sessions", post(create_session))
        .route("/sessions/{session_id}", get(get_session).delete(end_session))
        .route("/sessions/{session_id}/fields/{name}", put(update_field))
        .route("/sessions/{session_id}/submit", post(submit_session))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Heart Risk Intake Service",
        "version": "0.1.0",
        "description": "Collects clinical measurements and relays them to a risk-prediction service",
        "endpoints": {
            "GET /fields": "List the measurement fields and their domains",
            "POST /sessions": "Start a new intake session",
            "GET /sessions/{session_id}": "Current form, submission state and risk tier",
            "PUT /sessions/{session_id}/fields/{name}": "Set one field's raw value",
            "POST /sessions/{session_id}/submit": "Validate and submit the form",
            "DELETE /sessions/{session_id}": "End the session",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_fields() -> Json<Value> {
    Json(json!({ "fields": fields() }))
}

async fn create_session(State(state): State<AppState>) -> ApiResult<CreateSessionResponse> {
    let session = state.runner.create().await.map_err(map_risk_error)?;
    Ok(Json(CreateSessionResponse {
        session_id: session.id.clone(),
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<risk_flow::SessionSnapshot> {
    let snapshot = state
        .runner
        .snapshot(&session_id)
        .await
        .map_err(map_risk_error)?;
    Ok(Json(snapshot))
}

async fn update_field(
    State(state): State<AppState>,
    Path((session_id, name)): Path<(String, String)>,
    Json(request): Json<UpdateFieldRequest>,
) -> ApiResult<Value> {
    info!(session_id = %session_id, field = %name, "Updating field");

    let form = state
        .runner
        .update(&session_id, &name, request.value)
        .await
        .map_err(map_risk_error)?;

    Ok(Json(json!({
        "session_id": session_id,
        "form": form
    })))
}

async fn submit_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let session = state
        .runner
        .load(&session_id)
        .await
        .map_err(map_risk_error)?;

    // Run on its own task so a dropped HTTP connection cannot abandon the attempt
    let attempt = {
        let session = session.clone();
        tokio::spawn(async move { session.submit().await })
    };
    let outcome = attempt.await.map_err(|e| {
        error!("Submission task for session {} failed: {}", session_id, e);
        internal_error("Submission task failed", &e.to_string())
    })?;

    match outcome {
        SubmitOutcome::Resolved(submission) => {
            info!(session_id = %session_id, state = ?submission, "Submission finished");
            // report the outcome of this attempt, even if another one has started since
            let mut snapshot = session.snapshot();
            snapshot.tier = submission.tier();
            snapshot.submission = submission;
            Ok(Json(SubmitResponse {
                outcome: "resolved",
                session: snapshot,
            }))
        }
        SubmitOutcome::Ignored => Err((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "A submission is already in progress",
                "session_id": session_id
            })),
        )),
    }
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .runner
        .end(&session_id)
        .await
        .map_err(map_risk_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use risk_flow::{PredictionClient, PredictionRequest, ResponsePolicy, ServiceReply};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    struct FixedClient(&'static str);

    #[async_trait]
    impl PredictionClient for FixedClient {
        async fn send(&self, _request: &PredictionRequest) -> risk_flow::Result<ServiceReply> {
            Ok(ServiceReply {
                status: 200,
                body: self.0.to_string(),
            })
        }
    }

    /// Holds each request until released
    struct GatedClient {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl PredictionClient for GatedClient {
        async fn send(&self, _request: &PredictionRequest) -> risk_flow::Result<ServiceReply> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(ServiceReply {
                status: 200,
                body: r#"{"result":"Medium Risk"}"#.to_string(),
            })
        }
    }

    fn app_with(client: Arc<dyn PredictionClient>) -> Router {
        let runner = SubmissionRunner::new(
            client,
            Arc::new(InMemorySessionStorage::new()),
            ResponsePolicy::Lenient,
        );
        build_router(AppState { runner })
    }

    fn app() -> Router {
        app_with(Arc::new(FixedClient(r#"{"prediction":1,"result":"High Risk"}"#)))
    }

    async fn fill_mandatory(app: &Router, id: &str) {
        for (name, value) in [("age", "45"), ("sex", "1"), ("cp", "2"), ("trestbps", "130"), ("chol", "240")] {
            let (status, _) = call(
                app,
                "PUT",
                &format!("/sessions/{id}/fields/{name}"),
                Some(json!({ "value": value })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn lists_thirteen_fields() {
        let (status, body) = call(&app(), "GET", "/fields", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fields"].as_array().unwrap().len(), 13);
        assert_eq!(body["fields"][0]["name"], json!("age"));
    }

    #[tokio::test]
    async fn session_lifecycle_over_http() {
        let app = app();
        let (status, created) = call(&app, "POST", "/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["session_id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, "POST", &format!("/sessions/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submission"]["status"], json!("failed"));
        assert_eq!(body["submission"]["detail"], json!("Please fill all required fields"));

        fill_mandatory(&app, &id).await;

        let (status, body) = call(&app, "POST", &format!("/sessions/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], json!("resolved"));
        assert_eq!(body["submission"]["status"], json!("succeeded"));
        assert_eq!(body["submission"]["detail"], json!("High Risk"));
        assert_eq!(body["tier"], json!("High"));

        let (status, _) = call(&app, "DELETE", &format!("/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, "GET", &format!("/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_field_is_bad_request() {
        let app = app();
        let (_, created) = call(&app, "POST", "/sessions", None).await;
        let id = created["session_id"].as_str().unwrap();

        let (status, body) = call(
            &app,
            "PUT",
            &format!("/sessions/{id}/fields/bmi"),
            Some(json!({ "value": "22" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Unknown field: bmi"));
    }

    #[tokio::test]
    async fn submit_while_in_flight_is_conflict() {
        let client = Arc::new(GatedClient {
            started: Notify::new(),
            release: Notify::new(),
        });
        let app = app_with(client.clone());
        let (_, created) = call(&app, "POST", "/sessions", None).await;
        let id = created["session_id"].as_str().unwrap().to_string();
        fill_mandatory(&app, &id).await;

        let first = {
            let app = app.clone();
            let uri = format!("/sessions/{id}/submit");
            tokio::spawn(async move { call(&app, "POST", &uri, None).await })
        };
        client.started.notified().await;

        let (status, body) = call(&app, "POST", &format!("/sessions/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], json!("A submission is already in progress"));

        client.release.notify_one();
        let (status, body) = first.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["submission"]["detail"], json!("Medium Risk"));
        assert_eq!(body["tier"], json!("Medium"));
    }
}
