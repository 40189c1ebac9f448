use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::{self, AppConfig};
use crate::database::{MemoryReviewStore, PgReviewStore, ReviewStore};
use crate::routes;
use crate::services::{self, HttpAccessVerifier, HttpAuctionChecker};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "poptape-reviews")]
#[command(about = "Reviews of completed auctions, scoped per poptape user")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP service (default)")]
    Serve {
        #[arg(long, help = "Bind address, overrides REVIEWS_HOST")]
        host: Option<String>,

        #[arg(long, help = "Port, overrides REVIEWS_PORT")]
        port: Option<u16>,

        #[arg(long, help = "Keep reviews in process memory instead of Postgres")]
        in_memory: bool,
    },

    #[command(about = "Create the reviews table if it does not exist")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::config();

    match cli.command {
        Some(Commands::Serve { host, port, in_memory }) => serve(config, host, port, in_memory).await,
        Some(Commands::Migrate) => migrate(config).await,
        None => serve(config, None, None, false).await,
    }
}

async fn serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    in_memory: bool,
) -> anyhow::Result<()> {
    info!("Starting poptape-reviews in {:?} mode", config.environment);

    let client = services::http_client(&config.upstream).context("failed to build upstream HTTP client")?;
    let verifier = Arc::new(HttpAccessVerifier::new(
        client.clone(),
        config.upstream.check_access_url.clone(),
    ));
    let auctions = Arc::new(
        HttpAuctionChecker::new(client, &config.upstream.auction_url).context("invalid AUCTION_URL")?,
    );

    let pg_store = if in_memory {
        warn!("Using in-memory review store; reviews are lost on shutdown");
        None
    } else {
        let store = PgReviewStore::connect(&config.database)
            .await
            .context("failed to connect to the database")?;
        Some(store)
    };

    let store: Arc<dyn ReviewStore> = match &pg_store {
        Some(pg) => Arc::new(pg.clone()),
        None => Arc::new(MemoryReviewStore::new()),
    };

    let state = AppState::new(store, verifier, auctions)
        .with_payload_limit(config.api.max_request_size_bytes);
    let app = routes::app(state, config);

    let bind_addr = format!(
        "{}:{}",
        host.unwrap_or_else(|| config.server.host.clone()),
        port.unwrap_or(config.server.port)
    );
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Reviews API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server encountered an error")?;

    if let Some(pg) = pg_store {
        pg.close().await;
    }
    info!("Shutdown complete");
    Ok(())
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let store = PgReviewStore::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    store.ensure_schema().await.context("failed to create reviews table")?;
    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
