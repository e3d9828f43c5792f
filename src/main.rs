//! tournament_ledger - Social Tournament Ledger Backend API
//!
//! Users hold monetary balances, tournaments collect entry deposits into a
//! prize pool, and settlement pays the pool to the winner exactly once.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tournament_ledger::api::{self, RequestTimeout, ServiceHandle};
use tournament_ledger::domain::{Tournament, User};
use tournament_ledger::service::Ledger;
use tournament_ledger::store::MemoryStore;
use tournament_ledger::Config;

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tournament_ledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting tournament_ledger server");

    // Construct the store and the ledger facade explicitly; the service owns
    // no ambient global state.
    let users: MemoryStore<User> = MemoryStore::new();
    let tournaments: MemoryStore<Tournament> = MemoryStore::new();
    let service: ServiceHandle = Arc::new(Ledger::new(users, tournaments));

    let app = api::build_router(service, RequestTimeout(config.request_timeout));

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
