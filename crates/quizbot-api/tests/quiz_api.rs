// Integration tests for the HTTP surface: routing, status codes, CORS and
// byte-exact passthrough of topic documents.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use quizbot_api::router;
use quizbot_core::content::ContentStore;

fn app_with(files: &[(&str, &str)]) -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in files {
        std::fs::write(dir.path().join(name), body).unwrap();
    }
    let app = router(ContentStore::new(dir.path()));
    (dir, app)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn error_of(body: &str) -> String {
    let v: Value = serde_json::from_str(body).unwrap();
    v["error"].as_str().unwrap().to_string()
}

// ── Status endpoints ─────────────────────────────────────────────────

#[tokio::test]
async fn root_reports_online() {
    let (_dir, app) = app_with(&[]);
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["status"], "online");
    assert!(v["message"].is_string());
}

#[tokio::test]
async fn hello_has_message() {
    let (_dir, app) = app_with(&[]);
    let (status, body) = get(&app, "/api/hello").await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert!(v["message"].is_string());
}

// ── Quiz content ─────────────────────────────────────────────────────

#[tokio::test]
async fn existing_topic_returns_file_contents() {
    let (_dir, app) = app_with(&[("os.json", r#"{"q":1}"#)]);
    let (status, body) = get(&app, "/api/quiz/os").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"q":1}"#);
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let doc = r#"{"topic":"Fitter","questions":[{"id":"1","q":"?","options":["a","b"],"answer":0}]}"#;
    let (_dir, app) = app_with(&[("fitter.json", doc)]);
    let (_, first) = get(&app, "/api/quiz/fitter").await;
    let (_, second) = get(&app, "/api/quiz/fitter").await;
    assert_eq!(first, doc);
    assert_eq!(first, second);
}

#[tokio::test]
async fn edits_on_disk_are_visible_without_restart() {
    let (dir, app) = app_with(&[("os.json", r#"{"v":1}"#)]);
    assert_eq!(get(&app, "/api/quiz/os").await.1, r#"{"v":1}"#);
    std::fs::write(dir.path().join("os.json"), r#"{"v":2}"#).unwrap();
    assert_eq!(get(&app, "/api/quiz/os").await.1, r#"{"v":2}"#);
}

#[tokio::test]
async fn traversal_is_bad_request() {
    let (_dir, app) = app_with(&[]);
    for uri in [
        "/api/quiz/../../etc/passwd",
        "/api/quiz/..",
        "/api/quiz/os/extra",
        "/api/quiz/..%2F..%2Fetc%2Fpasswd",
        "/api/quiz/a%5Cb",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(error_of(&body), "Invalid topic ID", "{uri}");
    }
}

#[tokio::test]
async fn unknown_topic_is_not_found_and_named() {
    let (_dir, app) = app_with(&[("os.json", "{}")]);
    let (status, body) = get(&app, "/api/quiz/unknown_topic").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error_of(&body).contains("unknown_topic"));
}

#[tokio::test]
async fn broken_json_is_server_error_without_details() {
    let (_dir, app) = app_with(&[("broken.json", "{nope")]);
    let (status, body) = get(&app, "/api/quiz/broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_of(&body), "Failed to load quiz data");
}

#[tokio::test]
async fn non_get_is_method_not_allowed() {
    let (_dir, app) = app_with(&[("os.json", "{}")]);
    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/quiz/os")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── Topic listing ────────────────────────────────────────────────────

#[tokio::test]
async fn lists_available_topics() {
    let (_dir, app) = app_with(&[
        (
            "os.json",
            r#"{"topic":"Operating Systems","questions":[{"id":1},{"id":2},{"id":3}]}"#,
        ),
        ("cits.json", "[]"),
        ("readme.md", "#"),
    ]);
    let (status, body) = get(&app, "/api/topics").await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        v,
        serde_json::json!([
            { "id": "cits", "icon": "💡", "color": "#607d8b", "questionCount": 0 },
            {
                "id": "os",
                "name": "Operating Systems",
                "icon": "💻",
                "color": "#11998e",
                "questionCount": 3
            }
        ])
    );
}

#[tokio::test]
async fn listing_with_broken_topic_is_server_error() {
    let (_dir, app) = app_with(&[("os.json", "{}"), ("broken.json", "{not json")]);
    let (status, body) = get(&app, "/api/topics").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_of(&body), "Failed to load topics");
}

#[tokio::test]
async fn listing_unreadable_dir_is_server_error() {
    let app = router(ContentStore::new("/nonexistent/quizbot-content"));
    let (status, body) = get(&app, "/api/topics").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_of(&body), "Failed to load topics");
}

// ── CORS ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn cors_allows_any_origin() {
    let (_dir, app) = app_with(&[]);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/hello")
                .header(header::ORIGIN, "https://quiz.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
