//! moko-market — seller marketplace backend
//!
//! Long-running service that:
//! - Manages seller accounts (signup, one-time-code email verification, JWT login)
//! - Holds the seller's product catalog and stock levels
//! - Records multi-item sales atomically against the inventory
//! - Derives restock alerts from the committed sales history

mod api;
mod auth;
mod config;
mod db;
mod email;
mod error;
mod report;
mod state;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moko_market=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting moko-market (env: {})", config.environment);

    // Initialize application state (connects to Postgres, runs migrations)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("moko-market HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
