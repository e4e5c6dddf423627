mod config;
mod embeddings;
mod errors;
mod features;
mod github_client;
mod models;
mod resume_parser;
mod routes;
mod scoring;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::embeddings::HttpEmbedder;
use crate::features::assembler::FeatureAssembler;
use crate::features::resume::MarketSkillSet;
use crate::github_client::GitHubClient;
use crate::routes::build_router;
use crate::scoring::engine::ScoringEngine;
use crate::scoring::pipeline::ScoringPipeline;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so a bad value fails before anything starts
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting score engine v{}", env!("CARGO_PKG_VERSION"));

    let timeout = config.http_timeout();

    // Source-hosting client
    let github = GitHubClient::new(&config.github_api_url, config.github_token.clone(), timeout)
        .context("Failed to build GitHub client")?;
    info!(
        "GitHub client initialized ({})",
        if config.github_token.is_some() {
            "authenticated"
        } else {
            "anonymous"
        }
    );

    // Embedding oracles, loaded once and shared read-only
    let text_embedder = HttpEmbedder::new(
        &config.embedding_url,
        config.text_embedding_model.clone(),
        timeout,
    )
    .context("Failed to build text embedder")?;
    let code_embedder = HttpEmbedder::new(
        &config.embedding_url,
        config.code_embedding_model.clone(),
        timeout,
    )
    .context("Failed to build code embedder")?;
    info!(
        "Embedders initialized (text: {}, code: {})",
        text_embedder.model(),
        code_embedder.model()
    );

    let skills = MarketSkillSet::from_config(config.market_skills.as_deref());
    if skills.is_empty() {
        warn!("Market skill set is empty; market alignment will always be 0");
    } else {
        info!("Market skill set: {} keywords", skills.len());
    }

    let assembler = FeatureAssembler::new(
        Arc::new(github),
        Arc::new(text_embedder),
        Arc::new(code_embedder),
        Arc::new(skills),
    );
    let pipeline = ScoringPipeline::new(assembler, ScoringEngine::default());

    let state = AppState {
        pipeline: Arc::new(pipeline),
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
