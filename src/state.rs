use std::sync::Arc;

use crate::database::ReviewStore;
use crate::services::{AccessVerifier, AuctionChecker};

/// Largest create payload accepted unless configured otherwise.
pub const DEFAULT_PAYLOAD_LIMIT: usize = 1024 * 1024;

/// Capabilities shared by every request. Nothing in here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
    pub verifier: Arc<dyn AccessVerifier>,
    pub auctions: Arc<dyn AuctionChecker>,
    pub payload_limit: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ReviewStore>,
        verifier: Arc<dyn AccessVerifier>,
        auctions: Arc<dyn AuctionChecker>,
    ) -> Self {
        Self {
            store,
            verifier,
            auctions,
            payload_limit: DEFAULT_PAYLOAD_LIMIT,
        }
    }

    pub fn with_payload_limit(mut self, payload_limit: usize) -> Self {
        self.payload_limit = payload_limit;
        self
    }
}
