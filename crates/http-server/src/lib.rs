pub mod api;
pub mod core;
pub mod rate_limit;

use crate::core::AppState;
use crate::rate_limit::RateLimitState;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// CORS policy: configured origin allow-list with credentials. Credentials
/// forbid wildcards, so methods and headers are explicit lists.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
}

/// Builds the application router. Every route carries its own per-IP rate
/// limit; the API-key gate and CORS wrap the whole surface.
pub fn build_router(state: AppState, limits: Arc<RateLimitState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route(
            "/create",
            post(api::identity::create_person_handler).layer(
                middleware::from_fn_with_state(limits.clone(), rate_limit::create_limit),
            ),
        )
        .route(
            "/upgrade-email",
            post(api::mailbox::upgrade_email_handler).layer(
                middleware::from_fn_with_state(limits.clone(), rate_limit::upgrade_limit),
            ),
        )
        .route(
            "/inbox",
            get(api::mailbox::inbox_handler).layer(middleware::from_fn_with_state(
                limits.clone(),
                rate_limit::inbox_limit,
            )),
        )
        .route(
            "/message",
            get(api::mailbox::message_handler).layer(middleware::from_fn_with_state(
                limits,
                rate_limit::message_limit,
            )),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            core::api_key_gate,
        ))
        .layer(cors)
        .with_state(state)
}
