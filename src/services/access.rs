use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Header carrying the caller's opaque access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Missing access token")]
    MissingToken,

    #[error("Access check rejected with HTTP {0}")]
    Rejected(StatusCode),

    #[error("Access check failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid access check response: {0}")]
    InvalidResponse(String),
}

/// Exchanges an access token for the caller's `public_id`.
///
/// Results are never cached; each request is checked from scratch.
#[async_trait]
pub trait AccessVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Uuid, AccessError>;
}

#[derive(Deserialize)]
struct CheckAccessResponse {
    public_id: String,
}

/// Verifier backed by the remote authentication service
#[derive(Clone)]
pub struct HttpAccessVerifier {
    client: Client,
    check_access_url: String,
}

impl HttpAccessVerifier {
    pub fn new(client: Client, check_access_url: impl Into<String>) -> Self {
        Self {
            client,
            check_access_url: check_access_url.into(),
        }
    }
}

#[async_trait]
impl AccessVerifier for HttpAccessVerifier {
    async fn verify(&self, token: &str) -> Result<Uuid, AccessError> {
        if token.trim().is_empty() {
            return Err(AccessError::MissingToken);
        }

        let response = self
            .client
            .get(&self.check_access_url)
            .header(ACCESS_TOKEN_HEADER, token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AccessError::Rejected(response.status()));
        }

        let body: CheckAccessResponse = response
            .json()
            .await
            .map_err(|e| AccessError::InvalidResponse(e.to_string()))?;

        Uuid::parse_str(body.public_id.trim())
            .map_err(|_| AccessError::InvalidResponse(format!("public_id '{}' is not a UUID", body.public_id)))
    }
}
