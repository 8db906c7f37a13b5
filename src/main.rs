//! graph-ingest server binary

use graph_ingest::api::{build_router, AppState};
use graph_ingest::blob::{HttpBlobStore, HttpBlobStoreConfig};
use graph_ingest::config::Config;
use graph_ingest::extract::FactExtractor;
use graph_ingest::graph::{GraphSynchronizer, SparqlStore, SparqlStoreConfig};
use graph_ingest::ingest::IngestService;
use graph_ingest::ontology::Ontology;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = match std::env::var("GRAPH_INGEST_CONFIG") {
        Ok(path) => Config::from_file(&path)?,
        Err(_) => Config::from_env(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let graph_store = Arc::new(SparqlStore::new(SparqlStoreConfig {
        endpoint: config.graph_store.endpoint.clone(),
        timeout: Duration::from_millis(config.graph_store.timeout_ms),
    })?);

    let blob = Arc::new(HttpBlobStore::new(HttpBlobStoreConfig {
        base_url: config.blob_store.base_url.clone(),
        timeout: Duration::from_millis(config.blob_store.timeout_ms),
    })?);

    let ontology = Ontology::new(&config.ontology.base_namespace)?;
    let ingest = Arc::new(IngestService::new(
        blob.clone(),
        FactExtractor::new(ontology),
        GraphSynchronizer::new(graph_store.clone()),
        &config.ontology,
    )?);

    let config = Arc::new(config);
    let state = AppState {
        blob,
        graph_store,
        ingest,
        config: config.clone(),
    };

    let router = build_router(state, config.server.max_body_size);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
