//! HTTP API (axum): status endpoints plus read-only quiz content by topic.

use std::future::Future;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use quizbot_core::content::{ContentError, ContentStore};

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub content: ContentStore,
}

// ── Error helpers ─────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": msg })))
}

fn content_error(e: ContentError) -> impl IntoResponse {
    match e {
        // Fixed message; never echoes the rejected path.
        ContentError::InvalidIdentifier => json_error(StatusCode::BAD_REQUEST, "Invalid topic ID"),
        e @ ContentError::NotFound(_) => json_error(StatusCode::NOT_FOUND, &e.to_string()),
        other => {
            tracing::error!("content error: {other}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load quiz data")
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(content: ContentStore) -> Router {
    let state = AppState { content };

    Router::new()
        .route("/", get(read_root))
        .route("/api/hello", get(hello))
        .route("/api/topics", get(list_topics))
        // Catch-all so multi-segment ids reach validation instead of a router 404.
        .route("/api/quiz/{*topic_id}", get(get_quiz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve `app` until `shutdown` resolves, then drain in-flight requests.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("HTTP API listening on {addr}");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn read_root() -> Json<Value> {
    Json(json!({ "status": "online", "message": "Quiz Bot & API Running" }))
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "Telegram Quiz Backend Running" }))
}

async fn get_quiz(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> impl IntoResponse {
    match state.content.load(&topic_id).await {
        Ok(doc) => (StatusCode::OK, Json(doc)).into_response(),
        Err(e) => content_error(e).into_response(),
    }
}

async fn list_topics(State(state): State<AppState>) -> impl IntoResponse {
    match state.content.list().await {
        Ok(topics) => (StatusCode::OK, Json(json!(topics))).into_response(),
        Err(e) => {
            tracing::error!("failed to list topics: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load topics").into_response()
        }
    }
}
