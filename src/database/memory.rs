use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::review::{NewReview, Review};
use crate::database::repository::{ReviewStore, StoreError};

/// In-process review store with the same uniqueness and ordering rules as
/// the Postgres store. Used by the test suites and for running without a
/// database.
#[derive(Default)]
pub struct MemoryReviewStore {
    rows: RwLock<Vec<Review>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-built records as-is, keeping their ids and timestamps
    pub async fn seed(&self, reviews: impl IntoIterator<Item = Review>) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        for review in reviews {
            Self::check_unique(&rows, review.review_id, review.public_id, review.auction_id)?;
            rows.push(review);
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn check_unique(
        rows: &[Review],
        review_id: Uuid,
        public_id: Uuid,
        auction_id: Uuid,
    ) -> Result<(), StoreError> {
        if rows.iter().any(|r| r.review_id == review_id) {
            return Err(StoreError::Conflict(format!("duplicate review_id {}", review_id)));
        }
        if rows
            .iter()
            .any(|r| r.public_id == public_id && r.auction_id == auction_id)
        {
            return Err(StoreError::Conflict(format!(
                "user {} already reviewed auction {}",
                public_id, auction_id
            )));
        }
        Ok(())
    }

    async fn filter(&self, predicate: impl Fn(&Review) -> bool) -> Vec<Review> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn insert(&self, public_id: Uuid, review: &NewReview) -> Result<Uuid, StoreError> {
        let review_id = Uuid::new_v4();

        // Check and push under one write guard so racing inserts cannot both pass.
        let mut rows = self.rows.write().await;
        Self::check_unique(&rows, review_id, public_id, review.auction_id)?;
        rows.push(Review {
            review_id,
            public_id,
            auction_id: review.auction_id,
            review: review.review.clone(),
            overall: review.overall,
            post_and_packaging: review.post_and_packaging,
            communication: review.communication,
            as_described: review.as_described,
            created: Utc::now(),
        });
        Ok(review_id)
    }

    async fn get_by_id(&self, review_id: Uuid) -> Result<Review, StoreError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|r| r.review_id == review_id)
            .cloned()
            .ok_or(StoreError::NotFound(review_id))
    }

    async fn list_by_owner(&self, public_id: Uuid) -> Result<Vec<Review>, StoreError> {
        Ok(self.filter(|r| r.public_id == public_id).await)
    }

    async fn list_by_auction(&self, auction_id: Uuid) -> Result<Vec<Review>, StoreError> {
        Ok(self.filter(|r| r.auction_id == auction_id).await)
    }

    async fn delete(&self, review_id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.review_id != review_id);
        if rows.len() == before {
            return Err(StoreError::NotFound(review_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_review(auction_id: Uuid, overall: i32) -> NewReview {
        NewReview {
            auction_id,
            review: Some("amaze balls product".to_string()),
            overall,
            post_and_packaging: 4,
            communication: 4,
            as_described: 3,
        }
    }

    #[tokio::test]
    async fn second_review_for_same_auction_conflicts() {
        let store = MemoryReviewStore::new();
        let user = Uuid::new_v4();
        let auction = Uuid::new_v4();

        store.insert(user, &new_review(auction, 5)).await.unwrap();
        let err = store.insert(user, &new_review(auction, 1)).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list_by_owner(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_auction_different_users_is_allowed() {
        let store = MemoryReviewStore::new();
        let auction = Uuid::new_v4();

        store.insert(Uuid::new_v4(), &new_review(auction, 5)).await.unwrap();
        store.insert(Uuid::new_v4(), &new_review(auction, 2)).await.unwrap();

        assert_eq!(store.list_by_auction(auction).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn lists_keep_insertion_order() {
        let store = MemoryReviewStore::new();
        let user = Uuid::new_v4();
        let mut ids = Vec::new();
        for score in 0..4 {
            ids.push(store.insert(user, &new_review(Uuid::new_v4(), score)).await.unwrap());
        }

        let listed: Vec<Uuid> = store
            .list_by_user(user)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.review_id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn delete_missing_review_is_not_found() {
        let store = MemoryReviewStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.delete(id).await, Err(StoreError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = MemoryReviewStore::new();
        let id = store.insert(Uuid::new_v4(), &new_review(Uuid::new_v4(), 3)).await.unwrap();

        store.delete(id).await.unwrap();

        assert!(matches!(store.get_by_id(id).await, Err(StoreError::NotFound(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn concurrent_duplicate_inserts_admit_exactly_one() {
        let store = Arc::new(MemoryReviewStore::new());
        let user = Uuid::new_v4();
        let auction = Uuid::new_v4();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(user, &new_review(auction, 4)).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }
}
