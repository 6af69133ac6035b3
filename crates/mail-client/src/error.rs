use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the mail provider client. No operation retries; a single
/// upstream failure is surfaced immediately.
#[derive(Debug, Error)]
pub enum MailClientError {
    #[error("request to mail provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail provider returned no usable domains")]
    NoDomains,

    #[error("username already exists")]
    Conflict,

    #[error("message not found")]
    NotFound,

    #[error("mail provider returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },
}
