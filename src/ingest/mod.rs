//! Ingest task boundary
//!
//! One external event delivery is one attempt: fetch the detection record
//! from the blob store, decode it, extract triples, merge them into the
//! variant's named graph. Every failure is caught here, logged with its
//! nested cause when present, and swallowed; the trigger infrastructure
//! owns any retry policy. There is no partial success: the identifier is
//! validated before any triple is built, and a failed extraction never
//! reaches the store.

use crate::blob::BlobStore;
use crate::config::OntologyConfig;
use crate::error::{IngestError, Result};
use crate::extract::FactExtractor;
use crate::graph::{GraphSynchronizer, MergeOutcome};
use crate::metrics::METRICS;
use crate::ontology::Iri;
use crate::records::DetectionRecord;
use std::error::Error as _;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// How one record handling attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestStatus {
    /// All triples derived from the record were persisted.
    Persisted,
    /// The attempt failed at some step; the reason is the error kind tag.
    Failed(String),
}

/// Summary of one handled event, for callers that want to inspect the
/// outcome without this module raising.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub key: String,
    pub variant: Option<&'static str>,
    pub status: IngestStatus,
    pub triples: usize,
}

/// Stateless per-event ingestion pipeline.
///
/// Shared across concurrent tasks; the only mutable state lives in the
/// remote stores.
pub struct IngestService {
    blob: Arc<dyn BlobStore>,
    extractor: FactExtractor,
    synchronizer: GraphSynchronizer,
    selfies_graph: Iri,
    texts_graph: Iri,
}

impl IngestService {
    pub fn new(
        blob: Arc<dyn BlobStore>,
        extractor: FactExtractor,
        synchronizer: GraphSynchronizer,
        ontology_config: &OntologyConfig,
    ) -> Result<Self> {
        Ok(Self {
            blob,
            extractor,
            synchronizer,
            selfies_graph: Iri::parse(ontology_config.selfies_graph.clone())?,
            texts_graph: Iri::parse(ontology_config.texts_graph.clone())?,
        })
    }

    /// Target graph for a record variant.
    pub fn graph_for(&self, record: &DetectionRecord) -> &Iri {
        match record {
            DetectionRecord::Image(_) => &self.selfies_graph,
            DetectionRecord::Text(_) => &self.texts_graph,
        }
    }

    /// Handle one event delivery. Never raises; the report carries the
    /// outcome.
    pub async fn handle_event(&self, key: &str) -> IngestReport {
        let started = Instant::now();
        debug!("Received event for {}", key);

        match self.process(key).await {
            Ok((variant, outcome, triples)) => {
                METRICS.record_processed(variant, true);
                METRICS.triples_extracted.inc_by(triples as f64);
                METRICS.triples_merged.inc_by(outcome.added as f64);
                METRICS
                    .ingest_duration
                    .with_label_values(&[variant])
                    .observe(started.elapsed().as_secs_f64());
                info!(
                    "Persisted {}: variant={} triples={} new={}",
                    key, variant, triples, outcome.added
                );
                IngestReport {
                    key: key.to_string(),
                    variant: Some(variant),
                    status: IngestStatus::Persisted,
                    triples,
                }
            }
            Err(e) => {
                METRICS.record_failure(e.kind());
                error!("Failed to ingest {}: {}", key, e);
                if let Some(cause) = e.source() {
                    error!("Caused by: {}", cause);
                }
                IngestReport {
                    key: key.to_string(),
                    variant: None,
                    status: IngestStatus::Failed(e.kind().to_string()),
                    triples: 0,
                }
            }
        }
    }

    /// Handle a batch of event deliveries concurrently. Records are
    /// independent tasks; a failure in one never affects the others.
    pub async fn handle_batch(&self, keys: &[String]) -> Vec<IngestReport> {
        futures::future::join_all(keys.iter().map(|key| self.handle_event(key))).await
    }

    /// The fallible pipeline behind [`handle_event`]:
    /// fetch, decode, extract, merge.
    async fn process(&self, key: &str) -> Result<(&'static str, MergeOutcome, usize)> {
        let bytes = self.blob.get(key).await?;
        let record = DetectionRecord::from_json(&bytes)?;
        let variant = record.variant();
        debug!("Extracted {} record {}", variant, record.identifier());

        let triples = self.extractor.extract(&record)?;
        if triples.is_empty() {
            return Err(IngestError::Internal(format!(
                "extraction produced no triples for {}",
                key
            )));
        }

        let graph = self.graph_for(&record);
        let outcome = self.synchronizer.merge(graph, &triples, &[]).await?;

        Ok((variant, outcome, triples.len()))
    }
}
