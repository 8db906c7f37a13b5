//! Upload and export handlers
//!
//! The two request shapes the web client issues: upload a blob for
//! analysis, and export a named graph to the blob store in a chosen
//! serialization.

use crate::blob::BlobStore;
use crate::config::Config;
use crate::error::IngestError;
use crate::graph::{ExportFormat, GraphStore};
use crate::ingest::{IngestService, IngestStatus};
use crate::metrics::METRICS;
use crate::ontology::Iri;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use base64::Engine as _;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared by the handlers.
#[derive(Clone)]
pub struct AppState {
    pub blob: Arc<dyn BlobStore>,
    pub graph_store: Arc<dyn GraphStore>,
    pub ingest: Arc<IngestService>,
    pub config: Arc<Config>,
}

/// API error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

type HandlerError = (StatusCode, Json<ApiError>);

fn bad_request(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new("VALIDATION_ERROR", message)),
    )
}

fn internal_error(e: &IngestError) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new("INTERNAL_ERROR", e.to_string())),
    )
}

/// Image upload request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    pub name: String,
    pub base64_content: String,
}

/// Response carrying the blob key that was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub key: String,
}

/// Upload an image for analysis
///
/// POST /api/v1/upload/image
pub async fn upload_image(
    State(state): State<AppState>,
    Json(request): Json<UploadImageRequest>,
) -> Result<Json<UploadResponse>, HandlerError> {
    info!("Image upload request: name={}", request.name);

    if request.name.is_empty() {
        METRICS.record_upload(false);
        return Err(bad_request("Name cannot be empty"));
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(&request.base64_content)
        .map_err(|e| {
            METRICS.record_upload(false);
            bad_request(format!("Invalid base64 content: {}", e))
        })?;

    let key = format!("{}/{}", state.config.blob_store.image_prefix, request.name);
    match state.blob.put(&key, Bytes::from(data)).await {
        Ok(()) => {
            METRICS.record_upload(true);
            Ok(Json(UploadResponse { key }))
        }
        Err(e) => {
            METRICS.record_upload(false);
            error!("Image upload failed: {}", e);
            Err(internal_error(&e))
        }
    }
}

/// Upload a text for analysis. The body is the raw text; the key is
/// generated from the upload time.
///
/// POST /api/v1/upload/text
pub async fn upload_text(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<UploadResponse>, HandlerError> {
    info!("Text upload request: {} bytes", body.len());

    if body.is_empty() {
        METRICS.record_upload(false);
        return Err(bad_request("Body cannot be empty"));
    }

    let key = format!(
        "{}/{}.txt",
        state.config.blob_store.text_prefix,
        chrono::Utc::now().format("%d-%m-%Y_%H-%M-%S-%3f")
    );
    match state.blob.put(&key, Bytes::from(body)).await {
        Ok(()) => {
            METRICS.record_upload(true);
            Ok(Json(UploadResponse { key }))
        }
        Err(e) => {
            METRICS.record_upload(false);
            error!("Text upload failed: {}", e);
            Err(internal_error(&e))
        }
    }
}

/// Export query parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    pub export_type: String,
}

/// Export the selfies graph to the blob store
///
/// GET /api/v1/export?exportType=ttl|rdf
pub async fn export_graph(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<Json<UploadResponse>, HandlerError> {
    let format: ExportFormat = params.export_type.parse().map_err(|e: String| {
        METRICS.record_export(&params.export_type, false);
        bad_request(e)
    })?;

    info!("Export request: format={}", format);

    let graph = Iri::parse(state.config.ontology.selfies_graph.clone())
        .map_err(|e| internal_error(&e))?;

    let content = match state.graph_store.load_graph(&graph).await {
        Ok(content) => content,
        Err(e) => {
            METRICS.record_export(format.extension(), false);
            error!("Export load failed: {}", e);
            return Err(internal_error(&e));
        }
    };

    let rendered = format.write(content.iter());
    let key = format!(
        "{}/{}.{}",
        state.config.blob_store.export_prefix,
        chrono::Utc::now().format("%Y-%m-%d %H-%M-%S"),
        format.extension()
    );

    match state.blob.put(&key, Bytes::from(rendered)).await {
        Ok(()) => {
            METRICS.record_export(format.extension(), true);
            Ok(Json(UploadResponse { key }))
        }
        Err(e) => {
            METRICS.record_export(format.extension(), false);
            error!("Export store failed: {}", e);
            Err(internal_error(&e))
        }
    }
}

/// Ingest trigger request: the blob key of a detection record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub key: String,
}

/// Outcome of one ingest delivery. Failures are reported in the body,
/// not as an error status: the delivery itself completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub key: String,
    pub status: String,
    pub triples: usize,
}

/// Deliver one detection record event
///
/// POST /api/v1/ingest
pub async fn ingest_record(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, HandlerError> {
    if request.key.is_empty() {
        return Err(bad_request("Key cannot be empty"));
    }

    let report = state.ingest.handle_event(&request.key).await;
    let status = match &report.status {
        IngestStatus::Persisted => "persisted".to_string(),
        IngestStatus::Failed(kind) => format!("failed: {}", kind),
    };
    Ok(Json(IngestResponse {
        key: report.key,
        status,
        triples: report.triples,
    }))
}

/// Liveness probe
///
/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// Prometheus metrics
///
/// GET /metrics
pub async fn metrics() -> Result<String, HandlerError> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&METRICS.registry().gather(), &mut buffer)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("INTERNAL_ERROR", e.to_string())),
            )
        })?;
    String::from_utf8(buffer).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new("INTERNAL_ERROR", e.to_string())),
        )
    })
}
