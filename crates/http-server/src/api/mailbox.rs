// Mailbox routes: /upgrade-email, /inbox, /message

use crate::core::{ApiError, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use mail_client::MailClientError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

#[derive(Deserialize)]
pub struct UpgradeRequest {
    pub username: Option<String>,
}

#[derive(Serialize)]
pub struct UpgradeResponse {
    pub email: String,
    pub password: String,
    pub token: String,
    pub real_email_success: bool,
}

/// Upgrades a synthetic identity to a real mailbox at the provider:
/// creates the account, then exchanges the credentials for a bearer token.
/// The token is the caller's to retain; nothing is stored server-side.
pub async fn upgrade_email_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpgradeRequest>,
) -> Result<Json<UpgradeResponse>, ApiError> {
    // 1. Validate input before any outbound call.
    let username = payload
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing username.".to_string()))?;

    // 2. Create the mailbox account. A duplicate username surfaces as 409;
    //    any other failure collapses to a generic upgrade error.
    let (email, password) = match state.mail.create_account(&username).await {
        Ok(credentials) => credentials,
        Err(MailClientError::Conflict) => return Err(ApiError::Conflict),
        Err(cause) => {
            error!(error = %cause, "mailbox account creation failed");
            return Err(ApiError::UpgradeFailed);
        }
    };

    // 3. Exchange the fresh credentials for a bearer token.
    let token = match state.mail.issue_token(&email, &password).await {
        Ok(token) => token,
        Err(cause) => {
            error!(error = %cause, "token issuance failed");
            return Err(ApiError::UpgradeFailed);
        }
    };

    info!(email = %email, "upgraded identity to real mailbox");
    Ok(Json(UpgradeResponse {
        email,
        password,
        token,
        real_email_success: true,
    }))
}

#[derive(Deserialize)]
pub struct InboxQuery {
    pub token: String,
}

/// Lists inbox message summaries for the supplied token. Pure pass-through
/// of the provider's response.
pub async fn inbox_handler(
    State(state): State<AppState>,
    Query(query): Query<InboxQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let messages = state.mail.list_messages(&query.token).await?;
    Ok(Json(messages))
}

#[derive(Deserialize)]
pub struct MessageQuery {
    pub token: String,
    pub id: String,
}

/// Reads one message in full by provider id.
pub async fn message_handler(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Value>, ApiError> {
    let message = state.mail.read_message(&query.token, &query.id).await?;
    Ok(Json(message))
}
