use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::{AccessError, ACCESS_TOKEN_HEADER};
use crate::state::AppState;

/// Identity of the caller, as confirmed by the access verifier for this request only
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub public_id: Uuid,
}

/// Access token middleware that verifies the caller and injects `Caller`
pub async fn access_token_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(&headers)?;

    let public_id = state.verifier.verify(token).await?;
    tracing::debug!("Access token verified for {}", public_id);

    request.extensions_mut().insert(Caller { public_id });
    Ok(next.run(request).await)
}

/// Extract the access token from the `X-Access-Token` header
fn extract_token_from_headers(headers: &HeaderMap) -> Result<&str, AccessError> {
    let token = headers
        .get(ACCESS_TOKEN_HEADER)
        .ok_or(AccessError::MissingToken)?
        .to_str()
        .map_err(|_| AccessError::InvalidResponse("access token header is not valid ASCII".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AccessError::MissingToken);
    }
    Ok(token)
}
