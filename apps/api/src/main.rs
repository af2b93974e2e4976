mod catalog;
mod config;
mod errors;
mod extract;
mod filter;
mod matching;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::store::Catalog;
use crate::config::{Config, ScorerBackend};
use crate::matching::embedding::HttpEmbedder;
use crate::matching::lexical::LexicalScorer;
use crate::matching::scorer::SimilarityScorer;
use crate::matching::semantic::SemanticScorer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting internships API v{}", env!("CARGO_PKG_VERSION"));

    // Load the catalog; a single malformed row aborts startup
    let catalog = Catalog::load_csv(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load catalog from {}",
            config.catalog_path.display()
        )
    })?;

    let scorer = build_scorer(&config)?;
    info!("Similarity scorer initialized (backend: {})", scorer.backend());

    let state = AppState {
        catalog: Arc::new(RwLock::new(catalog)),
        scorer,
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

/// Picks the scorer backend named by `SCORER_BACKEND`.
fn build_scorer(config: &Config) -> Result<Arc<dyn SimilarityScorer>> {
    let scorer: Arc<dyn SimilarityScorer> = match config.scorer_backend {
        ScorerBackend::Lexical => Arc::new(LexicalScorer::new(config.strip_punctuation)),
        ScorerBackend::Semantic => {
            let embedder = HttpEmbedder::new(config.embedding.clone())
                .context("Failed to build embedding HTTP client")?;
            info!(
                model = %config.embedding.model,
                dimensions = config.embedding.dimensions,
                cache = config.embedding.cache,
                "Embedding provider configured"
            );
            Arc::new(SemanticScorer::new(
                Arc::new(embedder),
                config.embedding.cache,
            ))
        }
    };
    Ok(scorer)
}
