use std::sync::Arc;

use anyhow::{Context, Result};
use plainread_common::Config;
use plainread_scoring::{build_embedder, build_rewriter, ReferenceVocabulary, Simplifier};
use tracing_subscriber::EnvFilter;

use plainread_server::routes;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("plainread=info,tower_http=info")),
        )
        .json()
        .init();

    tracing::info!("Starting plainread-server");

    let config = Config::from_env()?;
    config.log_redacted();
    let policy = config.threshold_policy();

    let vocabulary = ReferenceVocabulary::load(&config.vocabulary_path)?;
    let embedder = build_embedder(&config).context("Failed to build embedder")?;
    let rewriter = build_rewriter(&config).context("Failed to build rewriter")?;

    let simplifier = Simplifier::builder()
        .vocabulary(Arc::new(vocabulary))
        .embedder(embedder)
        .rewriter(rewriter)
        .policy(policy)
        .build();

    let app = routes::build_router(simplifier);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
