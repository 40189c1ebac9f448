use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::{CreatedReview, NewReview, Review};
use crate::error::{ApiError, ApiResult};
use crate::middleware::Caller;
use crate::state::AppState;

/// GET /reviews - reviews written by the verified caller
pub async fn list_own(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Vec<Review>>> {
    let reviews = state.store.list_by_owner(caller.public_id).await?;
    Ok(Json(reviews))
}

/// GET /reviews/:review_id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
) -> ApiResult<Json<Review>> {
    let review = state.store.get_by_id(review_id).await?;
    Ok(Json(review))
}

/// GET /reviews/user/:public_id - public lookup, empty array when the user has none
pub async fn get_by_user(
    State(state): State<AppState>,
    Path(public_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Review>>> {
    let reviews = state.store.list_by_user(public_id).await?;
    Ok(Json(reviews))
}

/// GET /reviews/auction/:auction_id
pub async fn get_by_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Review>>> {
    let reviews = state.store.list_by_auction(auction_id).await?;
    Ok(Json(reviews))
}

/// POST /reviews
///
/// The auction must exist upstream before anything is written. A second
/// review of the same auction by the same user is a store conflict and
/// comes back as 500.
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Extension(payload): Extension<NewReview>,
) -> ApiResult<(StatusCode, Json<CreatedReview>)> {
    state.auctions.exists(payload.auction_id).await?;

    let review_id = state.store.insert(caller.public_id, &payload).await?;
    info!(
        "Created review {} by {} for auction {}",
        review_id, caller.public_id, payload.auction_id
    );

    Ok((StatusCode::CREATED, Json(CreatedReview { review_id })))
}

/// DELETE /reviews/:review_id - owner only; 410 once removed
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(review_id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let review = state.store.get_by_id(review_id).await?;

    if review.public_id != caller.public_id {
        warn!(
            "Refused delete of review {}: owner {} does not match caller {}",
            review_id, review.public_id, caller.public_id
        );
        return Err(ApiError::not_acceptable("Cannot delete a review written by another user"));
    }

    state.store.delete(review_id).await?;
    info!("Deleted review {} by {}", review_id, caller.public_id);

    Ok((StatusCode::GONE, Json(json!({ "message": "Review deleted" }))))
}
