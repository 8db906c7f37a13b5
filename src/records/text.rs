//! Text analysis record models

use super::image::Attribute;
use serde::{Deserialize, Serialize};

/// One detected named entity. Only the type participates in the graph
/// mapping; the value is carried for completeness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedEntity {
    #[serde(rename = "type")]
    pub entity_type: Attribute<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Full text analysis result as produced by the upstream NLP step.
///
/// `id` is generated once when the record is produced, not caller-supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub id: String,
    #[serde(default)]
    pub entities: Vec<DetectedEntity>,
    pub sentiment: Attribute<String>,
}

impl TextAnalysis {
    /// Create a record with a freshly generated identifier, the way the
    /// upstream producer assigns one.
    pub fn with_generated_id(entities: Vec<DetectedEntity>, sentiment: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            entities,
            sentiment: Attribute { value: sentiment },
        }
    }
}
