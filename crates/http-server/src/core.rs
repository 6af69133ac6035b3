use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use mail_client::MailClientError;
use serde_json::json;
use std::env;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

/// Shared application state for the Axum router.
#[derive(Clone)]
pub struct AppState {
    pub mail: Arc<mail_client::MailClient>,
    pub config: AppConfig,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port for the HTTP server to listen on.
    pub port: u16,

    /// Base URL of the temporary-email provider.
    pub mail_api_base_url: String,

    /// CORS origin allow-list.
    pub allowed_origins: Vec<String>,

    /// Expected value of the X-API-Key header, when enforcement is on.
    pub api_key: Option<String>,

    /// The API-key gate is a configuration point and stays inert unless
    /// this is set; by default every request passes.
    pub enforce_api_key: bool,

    /// Per-route request quotas (requests per minute, per client IP).
    pub create_rate_limit: u32,
    pub upgrade_rate_limit: u32,
    pub inbox_rate_limit: u32,
    pub message_rate_limit: u32,
}

impl AppConfig {
    /// Load configuration from environment variables, with defaults
    /// matching the deployed service.
    pub fn from_env() -> Self {
        AppConfig {
            port: parse_or("PORT", 8000),

            mail_api_base_url: env::var("MAIL_API_BASE_URL")
                .unwrap_or_else(|_| mail_client::DEFAULT_BASE_URL.to_string()),

            allowed_origins: parse_csv("ALLOWED_ORIGINS")
                .unwrap_or_else(|| vec!["http://localhost:5173".to_string()]),

            api_key: env::var("API_KEY").ok(),

            enforce_api_key: env::var("ENFORCE_API_KEY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),

            create_rate_limit: parse_or("CREATE_RATE_LIMIT", 50),
            upgrade_rate_limit: parse_or("UPGRADE_RATE_LIMIT", 5),
            inbox_rate_limit: parse_or("INBOX_RATE_LIMIT", 10),
            message_rate_limit: parse_or("MESSAGE_RATE_LIMIT", 10),
        }
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

// Define a custom error type for our API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Username already exists.")]
    Conflict,

    #[error("Email upgrade failed.")]
    UpgradeFailed,

    #[error("Mail provider error")]
    Upstream(#[from] MailClientError),
}

// Convert `ApiError` into an HTTP response. Bodies use the `detail` shape
// the frontend already consumes; internal causes are logged, not exposed.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict | ApiError::Upstream(MailClientError::Conflict) => (
                StatusCode::CONFLICT,
                "Username already exists.".to_string(),
            ),
            ApiError::UpgradeFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Email upgrade failed.".to_string(),
            ),
            ApiError::Upstream(MailClientError::NotFound) => {
                (StatusCode::NOT_FOUND, "Message not found.".to_string())
            }
            ApiError::Upstream(cause) => {
                error!(error = %cause, "mail provider request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "The mail provider request failed.".to_string(),
                )
            }
        };

        let body = Json(json!({ "detail": detail }));
        (status, body).into_response()
    }
}

/// Optional API-key gate. Inert unless `ENFORCE_API_KEY` is set; it exists
/// as a configuration point for deployments that want a shared secret.
pub async fn api_key_gate(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if state.config.enforce_api_key {
        let presented = req
            .headers()
            .get("x-api-key")
            .and_then(|v| v.to_str().ok());
        if presented != state.config.api_key.as_deref() {
            warn!("rejected request with missing or invalid API key");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "detail": "Invalid API key" })),
            )
                .into_response();
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default() {
        let value: u32 = parse_or("NONEXISTENT_LIMIT_VAR", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_csv() {
        env::set_var("TEST_ORIGINS", "http://a.test, http://b.test");
        let result = parse_csv("TEST_ORIGINS");
        assert_eq!(
            result,
            Some(vec![
                "http://a.test".to_string(),
                "http://b.test".to_string()
            ])
        );
        env::remove_var("TEST_ORIGINS");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let response = ApiError::Conflict.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::Upstream(MailClientError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
