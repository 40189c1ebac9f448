use axum::response::Json;
use serde_json::{json, Value};

/// GET /reviews/status - liveness only, touches nothing
pub async fn status() -> Json<Value> {
    Json(json!({
        "message": "System running...",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fallback for every path outside the route table
pub async fn not_found() -> crate::error::ApiError {
    crate::error::ApiError::not_found("Resource not found")
}
