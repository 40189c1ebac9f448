use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::models::review::{NewReview, Review};
use crate::database::repository::{ReviewStore, StoreError};

const CREATE_REVIEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    review_id UUID NOT NULL,
    public_id UUID NOT NULL,
    auction_id UUID NOT NULL,
    review VARCHAR(2000),
    overall INT NOT NULL DEFAULT 0,
    post_and_packaging INT NOT NULL DEFAULT 0,
    communication INT NOT NULL DEFAULT 0,
    as_described INT NOT NULL DEFAULT 0,
    created TIMESTAMPTZ NOT NULL DEFAULT now(),
    seq BIGSERIAL NOT NULL,
    CONSTRAINT reviews_pkey PRIMARY KEY (review_id),
    CONSTRAINT reviews_public_id_auction_id_key UNIQUE (public_id, auction_id)
)
"#;

const SELECT_REVIEW: &str = r#"
SELECT review_id, public_id, auction_id, review,
       overall, post_and_packaging, communication, as_described, created
FROM reviews
"#;

/// Review store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool using the configured URL and limits
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self::new(pool))
    }

    /// Create the reviews table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_REVIEWS_TABLE).execute(&self.pool).await?;
        info!("Reviews schema is in place");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    async fn select_where(&self, column: &str, value: Uuid) -> Result<Vec<Review>, StoreError> {
        let sql = format!("{} WHERE {} = $1 ORDER BY seq", SELECT_REVIEW, column);
        let rows = sqlx::query_as::<_, Review>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn insert(&self, public_id: Uuid, review: &NewReview) -> Result<Uuid, StoreError> {
        let review_id = Uuid::new_v4();

        let result = sqlx::query(
            r#"
            INSERT INTO reviews
                (review_id, public_id, auction_id, review,
                 overall, post_and_packaging, communication, as_described)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(review_id)
        .bind(public_id)
        .bind(review.auction_id)
        .bind(review.review.as_deref())
        .bind(review.overall)
        .bind(review.post_and_packaging)
        .bind(review.communication)
        .bind(review.as_described)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!("Inserted review {}", review_id);
                Ok(review_id)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Conflict(db_err.message().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_by_id(&self, review_id: Uuid) -> Result<Review, StoreError> {
        let sql = format!("{} WHERE review_id = $1", SELECT_REVIEW);
        sqlx::query_as::<_, Review>(&sql)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(review_id))
    }

    async fn list_by_owner(&self, public_id: Uuid) -> Result<Vec<Review>, StoreError> {
        self.select_where("public_id", public_id).await
    }

    async fn list_by_auction(&self, auction_id: Uuid) -> Result<Vec<Review>, StoreError> {
        self.select_where("auction_id", auction_id).await
    }

    async fn delete(&self, review_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(review_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_requires_database_url() {
        let config = DatabaseConfig {
            url: None,
            max_connections: 1,
            connection_timeout: 1,
        };
        let err = PgReviewStore::connect(&config).await.err().unwrap();
        assert!(matches!(err, StoreError::ConfigMissing("DATABASE_URL")));
    }

    #[test]
    fn schema_enforces_one_review_per_user_and_auction() {
        assert!(CREATE_REVIEWS_TABLE.contains("UNIQUE (public_id, auction_id)"));
        assert!(CREATE_REVIEWS_TABLE.contains("PRIMARY KEY (review_id)"));
    }
}
