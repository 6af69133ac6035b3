//! End-to-end tests for the HTTP surface, driving the router directly and
//! pointing the mail client at a local mock provider.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use http_body_util::BodyExt;
use http_server::core::{AppConfig, AppState};
use http_server::rate_limit::RateLimitState;
use mail_client::MailClient;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Call counters for the mock provider, used to assert which upstream
/// endpoints a handler actually reached.
#[derive(Clone, Default)]
struct MockProvider {
    account_calls: Arc<AtomicUsize>,
    token_calls: Arc<AtomicUsize>,
}

async fn mock_domains() -> Json<Value> {
    Json(json!({
        "hydra:member": [ { "domain": "mockmail.test", "isActive": true } ],
        "hydra:totalItems": 1
    }))
}

async fn mock_accounts(
    State(mock): State<MockProvider>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    mock.account_calls.fetch_add(1, Ordering::SeqCst);
    let address = body["address"].as_str().unwrap_or_default().to_string();
    if address.starts_with("taken@") || address.starts_with("taken.") {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "detail": "address: This value is already used." })),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(json!({ "address": address, "id": "acct-1" }))).into_response()
}

async fn mock_token(State(mock): State<MockProvider>) -> Json<Value> {
    mock.token_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "token": "tok-123", "id": "acct-1" }))
}

async fn mock_messages(request: Request<Body>) -> impl IntoResponse {
    let auth = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth.contains("boom") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "provider exploded" })),
        )
            .into_response();
    }
    Json(json!({
        "hydra:member": [
            { "id": "m1", "subject": "hello", "intro": "first" },
            { "id": "m2", "subject": "again", "intro": "second" }
        ],
        "hydra:totalItems": 2
    }))
    .into_response()
}

async fn mock_message_detail(Path(id): Path<String>) -> impl IntoResponse {
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
            .into_response();
    }
    Json(json!({ "id": id, "subject": "hello", "text": "full body" })).into_response()
}

/// Serve the mock provider on an ephemeral local port; return its base URL.
async fn spawn_mock_provider(mock: MockProvider) -> String {
    let app = Router::new()
        .route("/domains", get(mock_domains))
        .route("/accounts", post(mock_accounts))
        .route("/token", post(mock_token))
        .route("/messages", get(mock_messages))
        .route("/messages/:id", get(mock_message_detail))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn test_config(base_url: &str, limits: (u32, u32, u32, u32)) -> AppConfig {
    AppConfig {
        port: 0,
        mail_api_base_url: base_url.to_string(),
        allowed_origins: vec!["http://localhost:5173".to_string()],
        api_key: None,
        enforce_api_key: false,
        create_rate_limit: limits.0,
        upgrade_rate_limit: limits.1,
        inbox_rate_limit: limits.2,
        message_rate_limit: limits.3,
    }
}

/// Build a full application router wired to a fresh mock provider.
async fn test_app(limits: (u32, u32, u32, u32)) -> (Router, MockProvider) {
    let mock = MockProvider::default();
    let base_url = spawn_mock_provider(mock.clone()).await;

    let config = test_config(&base_url, limits);
    let mail = Arc::new(MailClient::with_base_url(&base_url).unwrap());
    let rate_limits = Arc::new(RateLimitState::new(
        config.create_rate_limit,
        config.upgrade_rate_limit,
        config.inbox_rate_limit,
        config.message_rate_limit,
    ));

    let state = AppState { mail, config };
    (http_server::build_router(state, rate_limits), mock)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, ip: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

fn post_empty(uri: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

// ============================================================================
// /create
// ============================================================================

#[tokio::test]
async fn test_create_returns_full_person() {
    let (app, _mock) = test_app((50, 5, 10, 10)).await;

    let response = app
        .oneshot(post_empty("/create", "10.0.0.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let person = body_json(response).await;
    for field in [
        "email",
        "username",
        "first_name",
        "last_name",
        "birthday",
        "nickname",
        "backstory",
        "address",
        "linkedin_photo_url",
        "facebook_photo_url",
        "avatar_url",
        "password",
    ] {
        assert!(!person[field].is_null(), "missing field {}", field);
    }

    // Synthetic mailbox, no token until upgraded.
    assert!(person["token"].is_null());
    let email = person["email"].as_str().unwrap();
    let username = person["username"].as_str().unwrap();
    assert_eq!(email, format!("{}@example.com", username));
    assert_eq!(person["password"].as_str().unwrap().len(), 12);

    let zip = person["address"]["zip_code"].as_str().unwrap();
    assert_eq!(zip.len(), 5);
    assert!(zip.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_create_rate_limit_blocks_fourth_request() {
    let (app, _mock) = test_app((3, 5, 10, 10)).await;

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(post_empty("/create", "10.0.0.2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(post_empty("/create", "10.0.0.2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body_json(response).await,
        json!({ "detail": "Rate limit exceeded" })
    );

    // A different client key is unaffected.
    let response = app
        .oneshot(post_empty("/create", "10.0.0.3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// /upgrade-email
// ============================================================================

#[tokio::test]
async fn test_upgrade_success_returns_mailbox_credentials() {
    let (app, mock) = test_app((50, 5, 10, 10)).await;

    let response = app
        .oneshot(post_json(
            "/upgrade-email",
            "10.0.1.1",
            json!({ "username": "neo.anderson42" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["email"], "neo.anderson42@mockmail.test");
    assert_eq!(body["token"], "tok-123");
    assert_eq!(body["real_email_success"], true);
    assert_eq!(body["password"].as_str().unwrap().len(), 12);

    assert_eq!(mock.account_calls.load(Ordering::SeqCst), 1);
    assert_eq!(mock.token_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upgrade_missing_username_is_rejected_before_outbound_call() {
    let (app, mock) = test_app((50, 5, 10, 10)).await;

    let response = app
        .clone()
        .oneshot(post_json("/upgrade-email", "10.0.1.2", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "Missing username.");

    // Empty string counts as missing too.
    let response = app
        .oneshot(post_json(
            "/upgrade-email",
            "10.0.1.2",
            json!({ "username": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(mock.account_calls.load(Ordering::SeqCst), 0);
    assert_eq!(mock.token_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upgrade_conflict_skips_token_issuance() {
    let (app, mock) = test_app((50, 5, 10, 10)).await;

    let response = app
        .oneshot(post_json(
            "/upgrade-email",
            "10.0.1.3",
            json!({ "username": "taken" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["detail"],
        "Username already exists."
    );

    assert_eq!(mock.account_calls.load(Ordering::SeqCst), 1);
    assert_eq!(mock.token_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upgrade_rate_limit() {
    let (app, _mock) = test_app((50, 2, 10, 10)).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/upgrade-email",
                "10.0.1.4",
                json!({ "username": "neo" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(post_json(
            "/upgrade-email",
            "10.0.1.4",
            json!({ "username": "neo" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// ============================================================================
// /inbox and /message
// ============================================================================

#[tokio::test]
async fn test_inbox_passes_summaries_through() {
    let (app, _mock) = test_app((50, 5, 10, 10)).await;

    let response = app
        .oneshot(get_request("/inbox?token=tok-123", "10.0.2.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["id"], "m1");
}

#[tokio::test]
async fn test_message_detail_and_not_found() {
    let (app, _mock) = test_app((50, 5, 10, 10)).await;

    let response = app
        .clone()
        .oneshot(get_request("/message?token=tok-123&id=m1", "10.0.2.2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "m1");
    assert_eq!(body["text"], "full body");

    let response = app
        .oneshot(get_request(
            "/message?token=tok-123&id=missing",
            "10.0.2.2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inbox_upstream_failure_maps_to_5xx() {
    let (app, _mock) = test_app((50, 5, 10, 10)).await;

    let response = app
        .oneshot(get_request("/inbox?token=boom", "10.0.2.3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    // The provider's failure body is logged, never surfaced.
    let body = body_json(response).await;
    assert_eq!(body["detail"], "The mail provider request failed.");
}

#[tokio::test]
async fn test_inbox_rate_limit_independent_of_message_route() {
    let (app, _mock) = test_app((50, 5, 1, 10)).await;

    let response = app
        .clone()
        .oneshot(get_request("/inbox?token=tok-123", "10.0.2.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/inbox?token=tok-123", "10.0.2.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // /message has its own counter.
    let response = app
        .oneshot(get_request("/message?token=tok-123&id=m1", "10.0.2.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// API-key gate
// ============================================================================

#[tokio::test]
async fn test_api_key_gate_is_inert_by_default() {
    let (app, _mock) = test_app((50, 5, 10, 10)).await;

    // No X-API-Key header at all; the gate passes.
    let response = app
        .oneshot(post_empty("/create", "10.0.3.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_key_gate_enforced_when_configured() {
    let mock = MockProvider::default();
    let base_url = spawn_mock_provider(mock.clone()).await;

    let mut config = test_config(&base_url, (50, 5, 10, 10));
    config.api_key = Some("sekrit".to_string());
    config.enforce_api_key = true;

    let rate_limits = Arc::new(RateLimitState::new(50, 5, 10, 10));
    let state = AppState {
        mail: Arc::new(MailClient::with_base_url(&base_url).unwrap()),
        config,
    };
    let app = http_server::build_router(state, rate_limits);

    let response = app
        .clone()
        .oneshot(post_empty("/create", "10.0.3.2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = Request::builder()
        .method("POST")
        .uri("/create")
        .header("x-api-key", "sekrit")
        .header("x-forwarded-for", "10.0.3.2")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
