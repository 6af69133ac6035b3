use crate::error::MailClientError;
use crate::models::{HydraCollection, ProviderAccount, ProviderDomain, TokenResponse};
use identity::{secure_password, PASSWORD_LENGTH};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

/// Production endpoint of the temporary-email provider.
pub const DEFAULT_BASE_URL: &str = "https://api.mail.tm";

// The upstream provider is uncontrolled; bound every call so a stalled
// request cannot starve the handler.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the mail provider's HTTP API. Stateless: every call is
/// a single outbound request with no retry, caching or session tracking.
#[derive(Debug, Clone)]
pub struct MailClient {
    http: reqwest::Client,
    base_url: String,
}

impl MailClient {
    pub fn new() -> Result<Self, MailClientError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a custom provider endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, MailClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches the provider's domain list and returns the first entry.
    #[instrument(skip(self))]
    pub async fn resolve_domain(&self) -> Result<String, MailClientError> {
        let resp = self.http.get(self.endpoint("/domains")).send().await?;
        let resp = check_status(resp).await?;

        let domains: HydraCollection<ProviderDomain> = resp.json().await?;
        domains
            .member
            .into_iter()
            .next()
            .map(|d| d.domain)
            .ok_or(MailClientError::NoDomains)
    }

    /// Creates a real mailbox for the given username on the provider's
    /// first available domain. The password is freshly generated from the
    /// secure source. Returns the provider-echoed address and the password.
    #[instrument(skip(self))]
    pub async fn create_account(
        &self,
        username: &str,
    ) -> Result<(String, String), MailClientError> {
        let domain = self.resolve_domain().await?;
        let address = format!("{}@{}", username, domain);
        let password = secure_password(PASSWORD_LENGTH);

        debug!(address = %address, "creating mailbox account");
        let resp = self
            .http
            .post(self.endpoint("/accounts"))
            .json(&json!({ "address": address, "password": password }))
            .send()
            .await?;

        if resp.status() == StatusCode::CONFLICT {
            return Err(MailClientError::Conflict);
        }
        let resp = check_status(resp).await?;

        let account: ProviderAccount = resp.json().await?;
        Ok((account.address, password))
    }

    /// Exchanges mailbox credentials for a bearer token.
    #[instrument(skip(self, password))]
    pub async fn issue_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, MailClientError> {
        let resp = self
            .http
            .post(self.endpoint("/token"))
            .json(&json!({ "address": email, "password": password }))
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let token: TokenResponse = resp.json().await?;
        Ok(token.token)
    }

    /// Lists message summaries for the mailbox behind the token. The
    /// summaries are passed through as raw JSON; this service adds nothing.
    #[instrument(skip(self, token))]
    pub async fn list_messages(&self, token: &str) -> Result<Vec<Value>, MailClientError> {
        let resp = self
            .http
            .get(self.endpoint("/messages"))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let messages: HydraCollection<Value> = resp.json().await?;
        Ok(messages.member)
    }

    /// Fetches one message in full by provider id.
    #[instrument(skip(self, token))]
    pub async fn read_message(
        &self,
        token: &str,
        message_id: &str,
    ) -> Result<Value, MailClientError> {
        let resp = self
            .http
            .get(self.endpoint(&format!("/messages/{}", message_id)))
            .bearer_auth(token)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(MailClientError::NotFound);
        }
        let resp = check_status(resp).await?;

        Ok(resp.json().await?)
    }
}

/// Maps any non-2xx response to `Upstream`, capturing the body for logs.
async fn check_status(resp: Response) -> Result<Response, MailClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(MailClientError::Upstream { status, body })
}
