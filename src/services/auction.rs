use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("Auction not found: {0}")]
    NotFound(Uuid),

    #[error("Auction lookup rejected with HTTP {0}")]
    Rejected(StatusCode),

    #[error("Auction lookup failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid auction service URL: {0}")]
    InvalidUrl(String),
}

/// Confirms that an auction exists before a review may reference it.
#[async_trait]
pub trait AuctionChecker: Send + Sync {
    async fn exists(&self, auction_id: Uuid) -> Result<(), AuctionError>;
}

/// Checker backed by the remote auction house service
#[derive(Clone)]
pub struct HttpAuctionChecker {
    client: Client,
    base_url: Url,
}

impl HttpAuctionChecker {
    pub fn new(client: Client, auction_url: &str) -> Result<Self, AuctionError> {
        // Url::join drops the last segment unless the base ends in a slash.
        let normalized = if auction_url.ends_with('/') {
            auction_url.to_string()
        } else {
            format!("{}/", auction_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| AuctionError::InvalidUrl(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn auction_url(&self, auction_id: Uuid) -> Result<Url, AuctionError> {
        self.base_url
            .join(&auction_id.to_string())
            .map_err(|e| AuctionError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl AuctionChecker for HttpAuctionChecker {
    async fn exists(&self, auction_id: Uuid) -> Result<(), AuctionError> {
        let url = self.auction_url(auction_id)?;
        let response = self.client.get(url).send().await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(AuctionError::NotFound(auction_id)),
            status => Err(AuctionError::Rejected(status)),
        }
    }
}
