//! Configuration

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ontology namespace and target graphs
    #[serde(default)]
    pub ontology: OntologyConfig,

    /// Remote graph store
    #[serde(default)]
    pub graph_store: GraphStoreConfig,

    /// Blob store
    #[serde(default)]
    pub blob_store: BlobStoreConfig,

    /// HTTP surface
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ontology configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyConfig {
    /// Base namespace under which all derived IRIs live
    #[serde(default = "default_base_namespace")]
    pub base_namespace: String,

    /// Named graph receiving image-derived facts
    #[serde(default = "default_selfies_graph")]
    pub selfies_graph: String,

    /// Named graph receiving text-derived facts
    #[serde(default = "default_texts_graph")]
    pub texts_graph: String,
}

fn default_base_namespace() -> String {
    "http://graph-ingest/".to_string()
}

fn default_selfies_graph() -> String {
    "http://graph-ingest/selfies".to_string()
}

fn default_texts_graph() -> String {
    "http://graph-ingest/texts".to_string()
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            base_namespace: default_base_namespace(),
            selfies_graph: default_selfies_graph(),
            texts_graph: default_texts_graph(),
        }
    }
}

/// Graph store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStoreConfig {
    /// SPARQL endpoint URL
    #[serde(default = "default_graph_endpoint")]
    pub endpoint: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_graph_endpoint() -> String {
    "http://localhost:9999/sparql".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for GraphStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_graph_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Blob store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobStoreConfig {
    /// Base URL of the S3-compatible gateway
    #[serde(default = "default_blob_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Key prefix for uploaded images
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,

    /// Key prefix for uploaded texts
    #[serde(default = "default_text_prefix")]
    pub text_prefix: String,

    /// Key prefix for graph exports
    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,
}

fn default_blob_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_image_prefix() -> String {
    "images".to_string()
}

fn default_text_prefix() -> String {
    "texts".to_string()
}

fn default_export_prefix() -> String {
    "exports".to_string()
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_blob_url(),
            timeout_ms: default_timeout_ms(),
            image_prefix: default_image_prefix(),
            text_prefix: default_text_prefix(),
            export_prefix: default_export_prefix(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_size: default_max_body_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from a TOML file, with defaults for missing sections.
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;
        settings.try_deserialize()
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRAPH_INGEST_NAMESPACE") {
            config.ontology.base_namespace = val;
        }
        if let Ok(val) = std::env::var("GRAPH_INGEST_SELFIES_GRAPH") {
            config.ontology.selfies_graph = val;
        }
        if let Ok(val) = std::env::var("GRAPH_INGEST_TEXTS_GRAPH") {
            config.ontology.texts_graph = val;
        }
        if let Ok(val) = std::env::var("GRAPH_INGEST_STORE_ENDPOINT") {
            config.graph_store.endpoint = val;
        }
        if let Ok(val) = std::env::var("GRAPH_INGEST_BLOB_URL") {
            config.blob_store.base_url = val;
        }
        if let Ok(val) = std::env::var("GRAPH_INGEST_PORT") {
            if let Ok(port) = val.parse() {
                config.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("GRAPH_INGEST_LOG_LEVEL") {
            config.logging.level = val;
        }

        config
    }
}
