mod chat;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod search;
mod security;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::security::rate_limit::RateLimiter;
use crate::state::AppState;
use crate::store::postgres::PgJobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgJobStore::new(db));

    // Initialize LLM client
    let llm = LlmClient::new(config.groq_api_key.clone(), config.groq_model.clone());
    info!("LLM client initialized (model: {})", llm.model());

    info!(
        "Rate limits: search {}/{}s, chat {}/{}s",
        config.search_rate_limit.max_requests,
        config.search_rate_limit.window.as_secs(),
        config.chat_rate_limit.max_requests,
        config.chat_rate_limit.window.as_secs()
    );

    // Build app state
    let state = AppState {
        store,
        llm: Arc::new(llm),
        rate_limiter: Arc::new(RateLimiter::new()),
        search_limit: config.search_rate_limit,
        chat_limit: config.chat_rate_limit,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the frontend host once it has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
