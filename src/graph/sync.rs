//! Named graph synchronization
//!
//! One merge is one load/modify/save pass over a named graph. The cycle is
//! not transactional: a concurrent writer between load and save can be
//! lost. Callers that target the same subject concurrently must serialize
//! externally; independent subjects are additive and do not collide.

use crate::error::Result;
use crate::graph::store::GraphStore;
use crate::graph::triple::Triple;
use crate::ontology::Iri;
use indexmap::IndexSet;
use std::error::Error as _;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Result of one merge attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Triples present in the graph before the merge.
    pub loaded: usize,
    /// Additions not already present.
    pub added: usize,
    /// Removals that actually hit existing triples.
    pub removed: usize,
    /// Graph size after the merge.
    pub total: usize,
}

/// Merges addition/removal batches into named graphs on the remote store.
pub struct GraphSynchronizer {
    store: Arc<dyn GraphStore>,
}

impl GraphSynchronizer {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Load the target graph, apply removals then additions, persist the
    /// result. Logs one line on success and one or two lines (outer error
    /// plus nested cause when present) on failure.
    pub async fn merge(
        &self,
        graph: &Iri,
        additions: &[Triple],
        removals: &[Triple],
    ) -> Result<MergeOutcome> {
        match self.merge_inner(graph, additions, removals).await {
            Ok(outcome) => {
                info!(
                    "Updated triples successfully: graph={} loaded={} added={} removed={} total={}",
                    graph, outcome.loaded, outcome.added, outcome.removed, outcome.total
                );
                Ok(outcome)
            }
            Err(e) => {
                error!("Graph update failed: {}", e);
                if let Some(cause) = e.source() {
                    error!("Caused by: {}", cause);
                }
                Err(e)
            }
        }
    }

    async fn merge_inner(
        &self,
        graph: &Iri,
        additions: &[Triple],
        removals: &[Triple],
    ) -> Result<MergeOutcome> {
        let current = self.store.load_graph(graph).await?;
        let loaded = current.len();
        debug!("Loaded graph {} with {} triples", graph, loaded);

        let mut merged: IndexSet<Triple> = current;
        let mut removed = 0;
        for triple in removals {
            if merged.shift_remove(triple) {
                removed += 1;
            }
        }
        let mut added = 0;
        for triple in additions {
            if merged.insert(triple.clone()) {
                added += 1;
            }
        }

        self.store.update_graph(graph, additions, removals).await?;

        Ok(MergeOutcome {
            loaded,
            added,
            removed,
            total: merged.len(),
        })
    }
}
