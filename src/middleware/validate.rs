use axum::{
    body::{self, Body},
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Parse an identifier in its canonical hyphenated form only.
pub fn parse_identifier(value: &str) -> Option<Uuid> {
    if value.len() != 36 {
        return None;
    }
    Uuid::parse_str(value).ok()
}

/// Reject the request with 400 unless every path parameter is a UUID.
///
/// Runs ahead of token verification and the handler, so a malformed id never
/// reaches the store or an upstream service.
pub async fn validate_path_ids(
    params: RawPathParams,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    for (name, value) in params.iter() {
        if parse_identifier(value).is_none() {
            tracing::debug!("Rejected malformed {} '{}'", name, value);
            return Err(ApiError::bad_request(format!("Invalid {}: '{}' is not a UUID", name, value)));
        }
    }
    Ok(next.run(request).await)
}

/// Decode the JSON body into `T` and hand it to the handler as an extension.
///
/// Type errors such as a non-numeric score are a 400 here rather than the
/// 422 the stock `Json` extractor would produce.
pub async fn decode_payload<T>(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();

    let bytes = body::to_bytes(body, state.payload_limit)
        .await
        .map_err(|e| ApiError::bad_request(format!("Unable to read request body: {}", e)))?;

    let payload: T = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::bad_request(format!("Invalid request payload: {}", e)))?;

    let mut request = Request::from_parts(parts, Body::empty());
    request.extensions_mut().insert(payload);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_uuid() {
        assert!(parse_identifier("f38ba39a-3682-4803-a498-659f0bf05304").is_some());
    }

    #[test]
    fn rejects_non_hex_character() {
        assert!(parse_identifier("f38ba39a-3682-4803-a498-659f0bf0530g").is_none());
    }

    #[test]
    fn rejects_other_uuid_spellings() {
        assert!(parse_identifier("f38ba39a36824803a498659f0bf05304").is_none());
        assert!(parse_identifier("{f38ba39a-3682-4803-a498-659f0bf05304}").is_none());
        assert!(parse_identifier("").is_none());
    }

    #[test]
    fn rejects_truncated_segment() {
        assert!(parse_identifier("f38ba39a").is_none());
    }
}
