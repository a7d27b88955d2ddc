use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod chain;
mod config;
mod constants;
mod error;
mod models;
mod services;
mod utils;

use chain::{AptosClient, LocalSigner, TransactionSigner};
use config::Config;
use constants::API_VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rps_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Rock Paper Scissors backend");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);
    tracing::info!("Game module: {}::{}", config.module_owner, constants::GAME_MODULE);

    let chain = Arc::new(AptosClient::from_config(&config)?);
    let signer = LocalSigner::from_private_key_hex(&config.player_private_key)?;
    tracing::info!("Playing as {}", signer.address());

    let app_state = api::AppState::new(config.clone(), chain, Arc::new(signer));
    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    // CORS configuration
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Wallet
        .route(
            "/api/v1/wallet/balance",
            get(api::wallet::get_wallet_balance),
        )
        .route(
            "/api/v1/wallet/balance/cached",
            get(api::wallet::get_cached_wallet_balance),
        )
        // Bank
        .route("/api/v1/bank/balance", get(api::bank::get_bank_balance))
        .route("/api/v1/bank/deposit", post(api::bank::deposit))
        .route("/api/v1/bank/withdraw", post(api::bank::withdraw))
        .route("/api/v1/bank/events", get(api::events::get_bank_events))
        // Games
        .route("/api/v1/games", get(api::game::get_games))
        .route("/api/v1/games/play", post(api::game::play))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
