use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A buyer's review of a completed auction, as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub review_id: Uuid,
    pub public_id: Uuid,
    pub auction_id: Uuid,
    pub review: Option<String>,
    pub overall: i32,
    pub post_and_packaging: i32,
    pub communication: i32,
    pub as_described: i32,
    pub created: DateTime<Utc>,
}

/// Create payload. Scores must be JSON integers and default to 0 when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewReview {
    pub auction_id: Uuid,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub overall: i32,
    #[serde(default)]
    pub post_and_packaging: i32,
    #[serde(default)]
    pub communication: i32,
    #[serde(default)]
    pub as_described: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedReview {
    pub review_id: Uuid,
}
