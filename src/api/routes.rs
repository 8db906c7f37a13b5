//! Router configuration

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};

/// Build the upload/export router.
pub fn build_router(state: AppState, max_body_size: usize) -> Router {
    Router::new()
        .route("/api/v1/upload/image", post(handlers::upload_image))
        .route("/api/v1/upload/text", post(handlers::upload_text))
        .route("/api/v1/ingest", post(handlers::ingest_record))
        .route("/api/v1/export", get(handlers::export_graph))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::config::Config;
    use crate::extract::FactExtractor;
    use crate::graph::{GraphSynchronizer, MemoryGraphStore};
    use crate::ingest::IngestService;
    use crate::ontology::Ontology;
    use std::sync::Arc;

    #[test]
    fn test_router_builds() {
        let blob = Arc::new(MemoryBlobStore::new());
        let graph_store = Arc::new(MemoryGraphStore::new());
        let config = Arc::new(Config::default());
        let ingest = Arc::new(
            IngestService::new(
                blob.clone(),
                FactExtractor::new(Ontology::new(&config.ontology.base_namespace).unwrap()),
                GraphSynchronizer::new(graph_store.clone()),
                &config.ontology,
            )
            .unwrap(),
        );
        let state = AppState {
            blob,
            graph_store,
            ingest,
            config,
        };
        let _router = build_router(state, 1024 * 1024);
    }
}
