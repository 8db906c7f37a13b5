//! Remote graph store access
//!
//! The store is reached through two operations only: load a named graph,
//! and apply an additions/removals delta to it. No transaction or
//! versioning API is assumed.

use crate::error::{IngestError, Result};
use crate::graph::ntriples;
use crate::graph::triple::Triple;
use crate::ontology::Iri;
use async_trait::async_trait;
use indexmap::IndexSet;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Remote graph store contract.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Load the full content of a named graph. A graph that was never
    /// written is empty, not an error.
    async fn load_graph(&self, graph: &Iri) -> Result<IndexSet<Triple>>;

    /// Apply removals, then additions, to a named graph. Duplicate
    /// additions are absorbed by set semantics on the store side.
    async fn update_graph(
        &self,
        graph: &Iri,
        additions: &[Triple],
        removals: &[Triple],
    ) -> Result<()>;
}

/// SPARQL store client configuration.
#[derive(Debug, Clone)]
pub struct SparqlStoreConfig {
    /// SPARQL endpoint URL, e.g. `http://localhost:9999/sparql`.
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for SparqlStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9999/sparql".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Graph store client speaking the SPARQL 1.1 Graph Store HTTP Protocol
/// for loads and SPARQL Update for deltas.
pub struct SparqlStore {
    config: SparqlStoreConfig,
    client: Client,
}

impl SparqlStore {
    pub fn new(config: SparqlStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IngestError::Internal(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SparqlStoreConfig {
        &self.config
    }

    fn update_body(graph: &Iri, additions: &[Triple], removals: &[Triple]) -> String {
        let mut body = String::new();
        if !removals.is_empty() {
            body.push_str(&format!("DELETE DATA {{ GRAPH <{}> {{\n", graph));
            for triple in removals {
                body.push_str(&ntriples::write_triple(triple));
                body.push('\n');
            }
            body.push_str("} };\n");
        }
        if !additions.is_empty() {
            body.push_str(&format!("INSERT DATA {{ GRAPH <{}> {{\n", graph));
            for triple in additions {
                body.push_str(&ntriples::write_triple(triple));
                body.push('\n');
            }
            body.push_str("} }\n");
        }
        body
    }
}

#[async_trait]
impl GraphStore for SparqlStore {
    async fn load_graph(&self, graph: &Iri) -> Result<IndexSet<Triple>> {
        debug!("Loading graph {}", graph);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("graph", graph.as_str())])
            .header("Accept", "application/n-triples")
            .send()
            .await
            .map_err(IngestError::StoreUnavailable)?;

        // a graph that has never been written reads as empty
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            warn!("Graph {} not found in store, treating as empty", graph);
            return Ok(IndexSet::new());
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(IngestError::StoreUnavailable)?;

        if !status.is_success() {
            return Err(IngestError::StoreRejected {
                status: status.as_u16(),
                body,
            });
        }

        let triples = ntriples::parse_document(&body)?;
        debug!("Loaded {} triples from {}", triples.len(), graph);
        Ok(triples.into_iter().collect())
    }

    async fn update_graph(
        &self,
        graph: &Iri,
        additions: &[Triple],
        removals: &[Triple],
    ) -> Result<()> {
        if additions.is_empty() && removals.is_empty() {
            debug!("Empty delta for {}, skipping update", graph);
            return Ok(());
        }

        let body = Self::update_body(graph, additions, removals);
        debug!(
            "Updating graph {}: +{} -{}",
            graph,
            additions.len(),
            removals.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/sparql-update")
            .body(body)
            .send()
            .await
            .map_err(IngestError::StoreUnavailable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::StoreRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// In-memory graph store used by tests and local runs.
#[derive(Default)]
pub struct MemoryGraphStore {
    graphs: RwLock<HashMap<Iri, IndexSet<Triple>>>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn load_graph(&self, graph: &Iri) -> Result<IndexSet<Triple>> {
        Ok(self
            .graphs
            .read()
            .await
            .get(graph)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_graph(
        &self,
        graph: &Iri,
        additions: &[Triple],
        removals: &[Triple],
    ) -> Result<()> {
        let mut graphs = self.graphs.write().await;
        let content = graphs.entry(graph.clone()).or_default();
        for triple in removals {
            content.shift_remove(triple);
        }
        for triple in additions {
            content.insert(triple.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::triple::Term;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn triple(n: u32) -> Triple {
        Triple::new(
            iri(&format!("http://g/s{}", n)),
            iri("http://g/p"),
            Term::integer(n as i64),
        )
    }

    #[tokio::test]
    async fn test_memory_store_update_and_load() {
        let store = MemoryGraphStore::new();
        let graph = iri("http://g/graphs/a");

        store
            .update_graph(&graph, &[triple(1), triple(2)], &[])
            .await
            .unwrap();
        let content = store.load_graph(&graph).await.unwrap();
        assert_eq!(content.len(), 2);

        store
            .update_graph(&graph, &[triple(3)], &[triple(1)])
            .await
            .unwrap();
        let content = store.load_graph(&graph).await.unwrap();
        assert_eq!(content.len(), 2);
        assert!(!content.contains(&triple(1)));
        assert!(content.contains(&triple(3)));
    }

    #[tokio::test]
    async fn test_memory_store_unwritten_graph_is_empty() {
        let store = MemoryGraphStore::new();
        let content = store.load_graph(&iri("http://g/none")).await.unwrap();
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_absorbs_duplicates() {
        let store = MemoryGraphStore::new();
        let graph = iri("http://g/graphs/a");
        store.update_graph(&graph, &[triple(1)], &[]).await.unwrap();
        store.update_graph(&graph, &[triple(1)], &[]).await.unwrap();
        assert_eq!(store.load_graph(&graph).await.unwrap().len(), 1);
    }

    #[test]
    fn test_update_body_orders_removals_first() {
        let graph = iri("http://g/graphs/a");
        let body = SparqlStore::update_body(&graph, &[triple(2)], &[triple(1)]);
        let delete = body.find("DELETE DATA").unwrap();
        let insert = body.find("INSERT DATA").unwrap();
        assert!(delete < insert);
        assert!(body.contains("GRAPH <http://g/graphs/a>"));
    }

    #[test]
    fn test_update_body_omits_empty_blocks() {
        let graph = iri("http://g/graphs/a");
        let body = SparqlStore::update_body(&graph, &[triple(1)], &[]);
        assert!(!body.contains("DELETE DATA"));
        assert!(body.contains("INSERT DATA"));
    }
}
