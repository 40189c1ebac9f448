use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::review::{NewReview, Review};

/// Errors from review stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Review not found: {0}")]
    NotFound(Uuid),

    /// Primary key collision or a second review for the same (public_id, auction_id).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence for review records.
///
/// Lists come back in insertion order. Uniqueness of `review_id` and of the
/// (`public_id`, `auction_id`) pair is enforced by the store itself, so
/// concurrent inserts for the same pair resolve to exactly one success.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Persist a new review under a freshly generated `review_id`.
    async fn insert(&self, public_id: Uuid, review: &NewReview) -> Result<Uuid, StoreError>;

    async fn get_by_id(&self, review_id: Uuid) -> Result<Review, StoreError>;

    /// Reviews authored by the verified caller.
    async fn list_by_owner(&self, public_id: Uuid) -> Result<Vec<Review>, StoreError>;

    async fn list_by_auction(&self, auction_id: Uuid) -> Result<Vec<Review>, StoreError>;

    /// Public lookup of a user's reviews; same result as `list_by_owner`.
    async fn list_by_user(&self, public_id: Uuid) -> Result<Vec<Review>, StoreError> {
        self.list_by_owner(public_id).await
    }

    /// Remove a review. Ownership must already have been checked by the caller.
    async fn delete(&self, review_id: Uuid) -> Result<(), StoreError>;
}
