mod ai;
mod applications;
mod auth;
mod companies;
mod config;
mod db;
mod errors;
mod extract;
mod jobs;
mod latex;
mod llm_client;
mod models;
mod resume;
mod routes;
mod saved_jobs;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::PgStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job board API v{}", env!("CARGO_PKG_VERSION"));

    // Postgres (runs pending migrations)
    let pool = create_pool(&config.database_url).await?;
    let storage = Arc::new(PgStorage::new(pool));

    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
    );
    info!("LLM client initialized (model: {})", llm.model());

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    info!("Serving uploads from {}", config.upload_dir.display());

    let state = AppState {
        storage,
        llm,
        tokens: TokenKeys::new(config.jwt_secret.as_bytes(), config.jwt_ttl_hours),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
