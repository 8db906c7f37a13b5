//! Detection record models
//!
//! Detection records are the structured output of the upstream analysis
//! steps, read back from the blob store as JSON. The two shapes are
//! distinguished explicitly here rather than by duck-typed field access.

pub mod image;
pub mod text;

pub use image::{
    AgeRange, Attribute, BoundingBox, Emotion, FaceDetail, ImageAnalysis, ParentLabel, SceneLabel,
};
pub use text::{DetectedEntity, TextAnalysis};

use crate::error::{IngestError, Result};

/// A detection record: image analysis or text analysis.
#[derive(Debug, Clone)]
pub enum DetectionRecord {
    Image(ImageAnalysis),
    Text(TextAnalysis),
}

impl DetectionRecord {
    /// Decode a record from JSON, selecting the variant by its
    /// discriminating field: image records carry `imageName`, text records
    /// carry `id`. Anything else is rejected.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| IngestError::Decode(e.to_string()))?;

        let object = value
            .as_object()
            .ok_or_else(|| IngestError::Decode("record is not a JSON object".to_string()))?;

        if object.contains_key("imageName") {
            let analysis: ImageAnalysis = serde_json::from_value(value)
                .map_err(|e| IngestError::Decode(format!("image record: {}", e)))?;
            Ok(Self::Image(analysis))
        } else if object.contains_key("id") {
            let analysis: TextAnalysis = serde_json::from_value(value)
                .map_err(|e| IngestError::Decode(format!("text record: {}", e)))?;
            Ok(Self::Text(analysis))
        } else {
            Err(IngestError::Decode(
                "record has neither imageName nor id".to_string(),
            ))
        }
    }

    /// The record's external identifier.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Image(a) => &a.image_name,
            Self::Text(a) => &a.id,
        }
    }

    /// Short variant tag for logs and metrics.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Text(_) => "text",
        }
    }
}
