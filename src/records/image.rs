//! Image analysis record models

use serde::{Deserialize, Serialize};

/// Face bounding box, width and height as fractions of the frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Box area, the main-face selection criterion.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Attribute wrapper used throughout the upstream analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute<T> {
    pub value: T,
}

/// Detected age range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRange {
    pub low: i64,
    pub high: i64,
}

/// One (emotion, confidence) pair from the face analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emotion {
    #[serde(rename = "type")]
    pub emotion_type: String,
    pub confidence: f64,
}

/// One detected face with its attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceDetail {
    pub bounding_box: BoundingBox,
    pub gender: Attribute<String>,
    pub age_range: AgeRange,
    pub smile: Attribute<bool>,
    pub sunglasses: Attribute<bool>,
    #[serde(default)]
    pub emotions: Vec<Emotion>,
}

/// A scene label and its parent labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLabel {
    pub name: String,
    #[serde(default)]
    pub parents: Vec<ParentLabel>,
}

/// Parent of a scene label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentLabel {
    pub name: String,
}

/// Full image analysis result as produced by the upstream vision step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub image_name: String,
    #[serde(default)]
    pub labels: Vec<SceneLabel>,
    #[serde(default)]
    pub faces_details: Vec<FaceDetail>,
}

impl ImageAnalysis {
    /// The representative face: largest bounding-box area, first
    /// encountered wins ties. `None` when no faces were detected.
    pub fn main_face(&self) -> Option<&FaceDetail> {
        self.faces_details.iter().fold(None, |best, face| match best {
            Some(b) if face.bounding_box.area() <= b.bounding_box.area() => best,
            _ => Some(face),
        })
    }
}

impl FaceDetail {
    /// The emotion with the highest confidence, first encountered wins
    /// ties. `None` when the emotion list is empty.
    pub fn dominant_emotion(&self) -> Option<&Emotion> {
        self.emotions.iter().fold(None, |best, emotion| match best {
            Some(b) if emotion.confidence <= b.confidence => best,
            _ => Some(emotion),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(width: f64, height: f64) -> FaceDetail {
        FaceDetail {
            bounding_box: BoundingBox { width, height },
            gender: Attribute {
                value: "Female".to_string(),
            },
            age_range: AgeRange { low: 20, high: 30 },
            smile: Attribute { value: true },
            sunglasses: Attribute { value: false },
            emotions: vec![],
        }
    }

    #[test]
    fn test_main_face_largest_area() {
        let analysis = ImageAnalysis {
            image_name: "x.jpg".to_string(),
            labels: vec![],
            faces_details: vec![face(1.0, 10.0), face(4.0, 10.0), face(2.0, 10.0)],
        };
        let main = analysis.main_face().unwrap();
        assert_eq!(main.bounding_box.area(), 40.0);
    }

    #[test]
    fn test_main_face_tie_break_first_encountered() {
        // areas [10, 40, 40]: the second face wins, never the first
        let analysis = ImageAnalysis {
            image_name: "x.jpg".to_string(),
            labels: vec![],
            faces_details: vec![face(1.0, 10.0), face(4.0, 10.0), face(8.0, 5.0)],
        };
        let main = analysis.main_face().unwrap();
        assert_eq!(main.bounding_box.width, 4.0);
    }

    #[test]
    fn test_main_face_none_when_empty() {
        let analysis = ImageAnalysis {
            image_name: "x.jpg".to_string(),
            labels: vec![],
            faces_details: vec![],
        };
        assert!(analysis.main_face().is_none());
    }

    #[test]
    fn test_dominant_emotion_tie_break() {
        let mut f = face(1.0, 1.0);
        f.emotions = vec![
            Emotion {
                emotion_type: "HAPPY".to_string(),
                confidence: 0.9,
            },
            Emotion {
                emotion_type: "CALM".to_string(),
                confidence: 0.9,
            },
        ];
        assert_eq!(f.dominant_emotion().unwrap().emotion_type, "HAPPY");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "imageName": "selfie.jpg",
            "labels": [{"name": "Person", "parents": [{"name": "Human"}]}],
            "facesDetails": [{
                "boundingBox": {"width": 0.4, "height": 0.5},
                "gender": {"value": "Male"},
                "ageRange": {"low": 25, "high": 35},
                "smile": {"value": false},
                "sunglasses": {"value": true},
                "emotions": [{"type": "CALM", "confidence": 99.1}]
            }]
        }"#;
        let analysis: ImageAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.image_name, "selfie.jpg");
        assert_eq!(analysis.labels[0].parents[0].name, "Human");
        assert_eq!(analysis.faces_details[0].age_range.high, 35);
    }
}
