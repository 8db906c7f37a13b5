//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Ingestion metrics
    pub records_processed: CounterVec,
    pub ingest_failures: CounterVec,
    pub triples_extracted: Counter,
    pub triples_merged: Counter,
    pub ingest_duration: HistogramVec,

    // Graph store metrics
    pub store_requests: CounterVec,

    // HTTP surface metrics
    pub upload_requests: CounterVec,
    pub export_requests: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let records_processed = register_counter_vec_with_registry!(
            Opts::new("records_processed_total", "Total detection records processed"),
            &["variant", "status"],
            registry
        )?;

        let ingest_failures = register_counter_vec_with_registry!(
            Opts::new("ingest_failures_total", "Total ingest failures by kind"),
            &["kind"],
            registry
        )?;

        let triples_extracted = register_counter_with_registry!(
            Opts::new("triples_extracted_total", "Total triples extracted from records"),
            registry
        )?;

        let triples_merged = register_counter_with_registry!(
            Opts::new("triples_merged_total", "Total new triples merged into graphs"),
            registry
        )?;

        let ingest_duration = register_histogram_vec_with_registry!(
            "ingest_duration_seconds",
            "End to end record handling duration in seconds",
            &["variant"],
            registry
        )?;

        let store_requests = register_counter_vec_with_registry!(
            Opts::new("store_requests_total", "Total graph store requests"),
            &["operation", "status"],
            registry
        )?;

        let upload_requests = register_counter_vec_with_registry!(
            Opts::new("upload_requests_total", "Total upload requests"),
            &["status"],
            registry
        )?;

        let export_requests = register_counter_vec_with_registry!(
            Opts::new("export_requests_total", "Total export requests"),
            &["format", "status"],
            registry
        )?;

        Ok(Self {
            registry,
            records_processed,
            ingest_failures,
            triples_extracted,
            triples_merged,
            ingest_duration,
            store_requests,
            upload_requests,
            export_requests,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one handled detection record
    pub fn record_processed(&self, variant: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.records_processed
            .with_label_values(&[variant, status])
            .inc();
    }

    /// Record an ingest failure by error kind
    pub fn record_failure(&self, kind: &str) {
        self.ingest_failures.with_label_values(&[kind]).inc();
    }

    /// Record an upload request
    pub fn record_upload(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.upload_requests.with_label_values(&[status]).inc();
    }

    /// Record an export request
    pub fn record_export(&self, format: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.export_requests
            .with_label_values(&[format, status])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        metrics.record_processed("image", true);
        metrics.record_failure("store_unavailable");
        metrics.record_export("ttl", true);
        assert!(!metrics.registry().gather().is_empty());
    }

    #[test]
    fn test_global_registry() {
        METRICS.record_processed("text", false);
    }
}
