//! graph-ingest
//!
//! Ingestion of detection records (image and text analysis results) into
//! an RDF knowledge graph. Records are fetched from a blob store, mapped
//! to triples under a fixed ontology with deterministic subject
//! identification, and merged idempotently into named graphs on a remote
//! SPARQL store. A small HTTP surface covers the upload and export
//! request shapes of the web client.

pub mod api;
pub mod blob;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod ingest;
pub mod metrics;
pub mod ontology;
pub mod records;

pub use config::Config;
pub use error::{IngestError, Result};

/// Commonly used types.
pub mod prelude {
    pub use crate::api::AppState;
    pub use crate::blob::{BlobStore, HttpBlobStore, MemoryBlobStore};
    pub use crate::config::Config;
    pub use crate::error::{IngestError, Result};
    pub use crate::extract::FactExtractor;
    pub use crate::graph::{
        ExportFormat, GraphStore, GraphSynchronizer, Literal, MemoryGraphStore, MergeOutcome,
        SparqlStore, Term, Triple,
    };
    pub use crate::ingest::{IngestReport, IngestService, IngestStatus};
    pub use crate::ontology::{Iri, Ontology};
    pub use crate::records::{DetectionRecord, ImageAnalysis, TextAnalysis};
}
