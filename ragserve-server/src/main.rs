//! ragserve binary: wires external clients into the pipeline and serves
//! the HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use ragserve_core::{
    FixedSizeChunker, OpenAIChatModel, OpenAIEmbeddingProvider, QdrantNamespaceStore, RagPipeline,
};
use ragserve_extract::{FileExtractor, TextExtractor, UrlExtractor};
use ragserve_server::{app_router, AppState, Environment, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Process-wide client handles: constructed once, shared read-only
    // across requests.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to build HTTP client")?;

    let embedding_provider =
        Arc::new(OpenAIEmbeddingProvider::new(http.clone(), &config.openai_api_key)?);
    let chat_model = Arc::new(OpenAIChatModel::new(http, &config.openai_api_key)?);
    let store = Arc::new(QdrantNamespaceStore::new(&config.qdrant_url)?);
    let chunker =
        Arc::new(FixedSizeChunker::new(config.rag.chunk_size, config.rag.chunk_overlap)?);

    let pipeline = Arc::new(
        RagPipeline::builder()
            .config(config.rag.clone())
            .embedding_provider(embedding_provider)
            .chat_model(chat_model)
            .store(store)
            .chunker(chunker)
            .build()?,
    );

    let state = AppState {
        pipeline,
        text_extractor: TextExtractor::new(),
        file_extractor: FileExtractor::new(),
        url_extractor: Arc::new(UrlExtractor::new(&config.webdriver_url)),
        expose_error_details: config.environment == Environment::Development,
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for ragserve")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("ragserve listening on http://{addr}");
    axum::serve(listener, app_router(state)).await?;
    Ok(())
}
