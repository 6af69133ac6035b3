use dotenvy::dotenv;
use http_server::core::{AppConfig, AppState};
use http_server::rate_limit::RateLimitState;
use mail_client::MailClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from a .env file.
    dotenv().ok();
    // Use a JSON logger for production-ready structured logging
    tracing_subscriber::fmt().json().init();

    // --- Configuration ---
    let config = AppConfig::from_env();
    let port = config.port;

    // --- Mail Provider Client ---
    let mail = match MailClient::with_base_url(&config.mail_api_base_url) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build mail provider client: {}", e);
            return Err(e.into());
        }
    };

    // --- Rate Limiter (process-wide counter store) ---
    let limits = Arc::new(RateLimitState::new(
        config.create_rate_limit,
        config.upgrade_rate_limit,
        config.inbox_rate_limit,
        config.message_rate_limit,
    ));
    limits.clone().start_cleanup_task();

    // --- Shared Application State (for Axum) ---
    let state = AppState { mail, config };

    let app = http_server::build_router(state, limits);

    // --- Start HTTP Server ---
    // Bind to 0.0.0.0 to be reachable in a container
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("HTTP Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    // Connect info feeds the rate limiter's client-IP fallback.
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );

    if let Err(e) = server.await {
        error!("Server error: {}", e);
    }

    Ok(())
}
