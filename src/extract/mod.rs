//! Fact extraction
//!
//! Pure transformation from a detection record to the list of triples that
//! describe it under the fixed ontology. No I/O happens here; the
//! identifier is validated before any triple is built, so a failing record
//! produces no triples at all.

use crate::error::Result;
use crate::graph::{Term, Triple};
use crate::ontology::Ontology;
use crate::records::{DetectionRecord, ImageAnalysis, TextAnalysis};

/// Derives graph facts from detection records.
///
/// Holds the injected ontology value; construction is cheap and the
/// extractor is freely shareable across tasks.
#[derive(Debug, Clone)]
pub struct FactExtractor {
    ontology: Ontology,
}

impl FactExtractor {
    pub fn new(ontology: Ontology) -> Self {
        Self { ontology }
    }

    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    /// Extract triples for either record variant.
    pub fn extract(&self, record: &DetectionRecord) -> Result<Vec<Triple>> {
        match record {
            DetectionRecord::Image(analysis) => self.extract_image(analysis),
            DetectionRecord::Text(analysis) => self.extract_text(analysis),
        }
    }

    /// Triples for an image analysis record.
    ///
    /// Output, in order: subject typing and label, the main-face attribute
    /// set, then the scene description. When the record carries no face
    /// detections the face cluster is omitted entirely.
    pub fn extract_image(&self, analysis: &ImageAnalysis) -> Result<Vec<Triple>> {
        let ont = &self.ontology;
        let subject = ont.subject(&analysis.image_name)?;

        let mut triples = vec![
            Triple::new(
                subject.clone(),
                ont.rdf_type.clone(),
                Term::iri(ont.selfie.clone()),
            ),
            Triple::new(
                subject.clone(),
                ont.rdfs_label.clone(),
                Term::string(&analysis.image_name),
            ),
        ];

        if let Some(face) = analysis.main_face() {
            let face_node = ont.face_detail_node(&analysis.image_name)?;
            triples.push(Triple::new(
                subject.clone(),
                ont.has_face_detail.clone(),
                Term::iri(face_node.clone()),
            ));
            triples.push(Triple::new(
                face_node.clone(),
                ont.rdf_type.clone(),
                Term::iri(ont.face_detail.clone()),
            ));
            triples.push(Triple::new(
                face_node.clone(),
                ont.is_gender.clone(),
                Term::string(face.gender.value.to_lowercase()),
            ));
            triples.push(Triple::new(
                face_node.clone(),
                ont.has_min_age.clone(),
                Term::integer(face.age_range.low),
            ));
            triples.push(Triple::new(
                face_node.clone(),
                ont.has_max_age.clone(),
                Term::integer(face.age_range.high),
            ));
            triples.push(Triple::new(
                face_node.clone(),
                ont.is_smiling.clone(),
                Term::boolean(face.smile.value),
            ));
            triples.push(Triple::new(
                face_node.clone(),
                ont.has_sunglasses.clone(),
                Term::boolean(face.sunglasses.value),
            ));
            if let Some(emotion) = face.dominant_emotion() {
                triples.push(Triple::new(
                    face_node,
                    ont.is_feeling.clone(),
                    Term::string(emotion.emotion_type.to_lowercase()),
                ));
            }
        }

        let scene_node = ont.scene_node(&analysis.image_name)?;
        triples.push(Triple::new(
            subject,
            ont.has_scene.clone(),
            Term::iri(scene_node.clone()),
        ));
        triples.push(Triple::new(
            scene_node.clone(),
            ont.rdf_type.clone(),
            Term::iri(ont.scene.clone()),
        ));

        for label in &analysis.labels {
            let label_node = ont.scene_label_node(&label.name)?;
            triples.push(Triple::new(
                scene_node.clone(),
                ont.is_described_by.clone(),
                Term::iri(label_node.clone()),
            ));
            for parent in &label.parents {
                triples.push(Triple::new(
                    label_node.clone(),
                    ont.has_parent.clone(),
                    Term::iri(ont.scene_label_node(&parent.name)?),
                ));
            }
        }

        Ok(triples)
    }

    /// Triples for a text analysis record.
    ///
    /// Entities of the same type collapse onto one shared resource; only
    /// entity types are captured, not values.
    pub fn extract_text(&self, analysis: &TextAnalysis) -> Result<Vec<Triple>> {
        let ont = &self.ontology;
        let subject = ont.subject(&analysis.id)?;

        let collection_node = ont.entity_collection_node(&analysis.id)?;
        let mut triples = vec![
            Triple::new(
                subject.clone(),
                ont.rdf_type.clone(),
                Term::iri(ont.text.clone()),
            ),
            Triple::new(
                subject.clone(),
                ont.rdfs_label.clone(),
                Term::string(&analysis.id),
            ),
            Triple::new(
                subject.clone(),
                ont.has_entity_collection.clone(),
                Term::iri(collection_node.clone()),
            ),
            Triple::new(
                collection_node.clone(),
                ont.rdf_type.clone(),
                Term::iri(ont.entity_collection.clone()),
            ),
        ];

        for entity in &analysis.entities {
            let entity_node = ont.entity_node(&entity.entity_type.value)?;
            triples.push(Triple::new(
                collection_node.clone(),
                ont.has_entity.clone(),
                Term::iri(entity_node.clone()),
            ));
            triples.push(Triple::new(
                entity_node,
                ont.rdf_type.clone(),
                Term::iri(ont.entity.clone()),
            ));
        }

        let sentiment_node = ont.sentiment_node(&analysis.id)?;
        let sentiment_class = ont.sentiment_class(&analysis.sentiment.value)?;
        triples.push(Triple::new(
            subject,
            ont.has_sentiment.clone(),
            Term::iri(sentiment_node.clone()),
        ));
        triples.push(Triple::new(
            sentiment_node,
            ont.rdf_type.clone(),
            Term::iri(sentiment_class.clone()),
        ));
        triples.push(Triple::new(
            sentiment_class,
            ont.rdfs_sub_class_of.clone(),
            Term::iri(ont.sentiment.clone()),
        ));

        Ok(triples)
    }
}
