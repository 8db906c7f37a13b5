//! Error types for the ingestion pipeline

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors produced by the ingestion pipeline
#[derive(Debug, Error)]
pub enum IngestError {
    /// A record identifier could not be turned into a syntactically valid IRI.
    /// No triples are produced for the record and the merge is aborted.
    #[error("invalid identifier {identifier:?}: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// The graph store could not be reached at the transport level.
    #[error("graph store unavailable: {0}")]
    StoreUnavailable(#[source] reqwest::Error),

    /// The graph store reported the update as semantically invalid.
    #[error("graph store rejected request with status {status}: {body}")]
    StoreRejected { status: u16, body: String },

    /// The blob store could not return the requested record.
    #[error("failed to fetch {key:?} from blob store: {reason}")]
    UpstreamFetchFailure { key: String, reason: String },

    /// The blob key does not exist.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The record JSON did not decode into a known detection record shape.
    #[error("failed to decode detection record: {0}")]
    Decode(String),

    /// A response from the graph store could not be parsed.
    #[error("failed to parse store response: {0}")]
    Parse(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl IngestError {
    /// Short stable tag for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } => "invalid_identifier",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::StoreRejected { .. } => "store_rejected",
            Self::UpstreamFetchFailure { .. } => "upstream_fetch_failure",
            Self::NotFound(_) => "not_found",
            Self::Decode(_) => "decode",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}
