#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use poptape_reviews::database::{MemoryReviewStore, Review};
use poptape_reviews::services::{AccessError, AccessVerifier, AuctionChecker, AuctionError};
use poptape_reviews::{router, AppState};

pub const OWNER: &str = "f38ba39a-3682-4803-a498-659f0bf05304";
pub const OTHER_OWNER: &str = "f38ba39a-3682-4803-a498-659f0bf05000";

pub const OWNER_TOKEN: &str = "faketoken";
pub const OTHER_TOKEN: &str = "othertoken";

pub const AUCTION_A: &str = "e77be9e0-bb00-49bc-9e7d-d7cc7072ab8c";
pub const CREATE_AUCTION: &str = "f38ba39a-3682-4803-a498-659f0b111111";

pub const CREATE_JSON: &str = r#"{"auction_id":"f38ba39a-3682-4803-a498-659f0b111111",
"review": "amazing product",
"overall": 4,
"post_and_packaging": 3,
"communication": 4,
"as_described": 4}"#;

pub fn uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("fixture uuid")
}

/// Token table standing in for the remote access service
#[derive(Default)]
pub struct StubVerifier {
    tokens: HashMap<String, Uuid>,
    calls: AtomicUsize,
}

impl StubVerifier {
    pub fn with_token(mut self, token: &str, public_id: Uuid) -> Self {
        self.tokens.insert(token.to_string(), public_id);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<Uuid, AccessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .get(token)
            .copied()
            .ok_or(AccessError::Rejected(StatusCode::UNAUTHORIZED))
    }
}

/// Known auctions standing in for the remote auction house
#[derive(Default)]
pub struct StubAuctions {
    known: HashSet<Uuid>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl StubAuctions {
    pub fn with_auction(mut self, auction_id: Uuid) -> Self {
        self.known.insert(auction_id);
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuctionChecker for StubAuctions {
    async fn exists(&self, auction_id: Uuid) -> Result<(), AuctionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuctionError::Rejected(StatusCode::SERVICE_UNAVAILABLE));
        }
        if self.known.contains(&auction_id) {
            Ok(())
        } else {
            Err(AuctionError::NotFound(auction_id))
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).with_context(|| format!("body is not JSON: {}", self.text()))
    }

    pub fn reviews(&self) -> Result<Vec<Review>> {
        serde_json::from_slice(&self.body).with_context(|| format!("body is not a review list: {}", self.text()))
    }

    pub fn review(&self) -> Result<Review> {
        serde_json::from_slice(&self.body).with_context(|| format!("body is not a review: {}", self.text()))
    }
}

/// Router wired to an isolated in-memory store and stub upstreams
pub struct TestApp {
    pub store: Arc<MemoryReviewStore>,
    pub verifier: Arc<StubVerifier>,
    pub auctions: Arc<StubAuctions>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryReviewStore::new());
        let verifier = Arc::new(
            StubVerifier::default()
                .with_token(OWNER_TOKEN, uuid(OWNER))
                .with_token(OTHER_TOKEN, uuid(OTHER_OWNER)),
        );
        let auctions = Arc::new(StubAuctions::default().with_auction(uuid(CREATE_AUCTION)));

        let state = AppState::new(store.clone(), verifier.clone(), auctions.clone());
        Self {
            store,
            verifier,
            auctions,
            router: router(state),
        }
    }

    /// Five reviews across two owners; two of them reference `AUCTION_A`
    pub async fn seeded() -> Result<Self> {
        let app = Self::new();
        app.store
            .seed(dummy_reviews())
            .await
            .context("failed to seed reviews")?;
        Ok(app)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json; charset=UTF-8");
        if let Some(token) = token {
            builder = builder.header("X-Access-Token", token);
        }
        let request = builder.body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let body = body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok(TestResponse {
            status,
            body: body.to_vec(),
        })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(Method::DELETE, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: &str) -> Result<TestResponse> {
        self.send(Method::POST, uri, token, Some(body)).await
    }
}

pub fn review(review_id: &str, public_id: &str, auction_id: &str, overall: i32) -> Review {
    Review {
        review_id: uuid(review_id),
        public_id: uuid(public_id),
        auction_id: uuid(auction_id),
        review: Some("amaze balls product".to_string()),
        overall,
        post_and_packaging: 4,
        communication: 4,
        as_described: 3,
        created: Utc::now(),
    }
}

pub fn dummy_reviews() -> Vec<Review> {
    vec![
        review("e8f48256-2460-418f-81b7-86dad2aa6e41", OTHER_OWNER, AUCTION_A, 5),
        review("e8f48256-2460-418f-81b7-86dad2aa6aaa", OWNER, AUCTION_A, 5),
        review("e8f48256-2460-418f-81b7-86dad2aa6111", OWNER, "e77be9e0-bb00-49bc-9e7d-d7cc7072ab11", 4),
        review("e8f48256-2460-418f-81b7-86dad2aa6222", OWNER, "e77be9e0-bb00-49bc-9e7d-d7cc7072ab22", 4),
        review("e8f48256-2460-418f-81b7-86dad2aa6333", OTHER_OWNER, "e77be9e0-bb00-49bc-9e7d-d7cc7072ab33", 4),
    ]
}
