pub mod access;
pub mod auction;

pub use access::{AccessError, AccessVerifier, HttpAccessVerifier, ACCESS_TOKEN_HEADER};
pub use auction::{AuctionChecker, AuctionError, HttpAuctionChecker};

use crate::config::UpstreamConfig;

/// Shared HTTP client for upstream calls, bounded by the configured timeout.
/// No retries are attempted.
pub fn http_client(config: &UpstreamConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
