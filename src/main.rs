use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

mod api;
mod config;
mod models;
mod services;

use api::handlers::AppState;
use config::Config;
use services::db_service::{ConnectionProvider, PostgresProvider};
use services::trainer::Trainer;
use services::vanna::{GroqVanna, VannaClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize the generation capability; without a credential it stays
    // unavailable for the process lifetime.
    let vanna: Option<Arc<dyn VannaClient>> = match &config.vanna.api_key {
        Some(api_key) => Some(Arc::new(GroqVanna::new(
            config.vanna.model.clone(),
            api_key.clone(),
        ))),
        None => {
            warn!("No GROQ_API_KEY configured, SQL generation disabled");
            None
        }
    };

    let provider: Arc<dyn ConnectionProvider> = Arc::new(PostgresProvider::new(config.database.clone()));

    // One-time connectivity probe; the root endpoint reports this snapshot
    // while /health re-checks on every call.
    let database_connected = match provider.acquire().await {
        Ok(connection) => {
            connection.close().await;
            info!("Connected to PostgreSQL database");
            true
        }
        Err(e) => {
            warn!("Database connection failed, running in limited mode: {}", e);
            false
        }
    };

    if let Some(vanna) = &vanna {
        if database_connected {
            Trainer::bootstrap_schema(vanna.as_ref()).await;
            info!("Vanna trained on database schema");
        }
    }

    let state = AppState {
        vanna,
        provider,
        database_connected_at_startup: database_connected,
    };

    let app = api::routes::create_router_with_state(state);

    let addr: SocketAddr = config
        .server_address()
        .parse()
        .context("invalid server address")?;
    info!("Starting Vanna AI service on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await?;

    Ok(())
}
