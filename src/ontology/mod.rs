//! Fixed ontology vocabulary and canonical IRI construction
//!
//! The ontology is an immutable value built once from configuration and
//! injected into the extractor and synchronizer. All derived IRIs go
//! through [`encode_segment`], applied once per raw identifier.

pub mod iri;

pub use iri::{encode_segment, Iri};

use crate::error::Result;

/// RDF syntax namespace.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDF schema namespace.
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// XML Schema datatype namespace.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// The fixed vocabulary under one base namespace.
///
/// Class and predicate IRIs are composed at construction; per-record
/// resource IRIs are derived through the `*_node` methods.
#[derive(Debug, Clone)]
pub struct Ontology {
    base: String,

    // cross-vocabulary terms
    pub rdf_type: Iri,
    pub rdfs_label: Iri,
    pub rdfs_sub_class_of: Iri,

    // image vocabulary
    pub selfie: Iri,
    pub face_detail: Iri,
    pub scene: Iri,
    pub has_face_detail: Iri,
    pub is_gender: Iri,
    pub has_min_age: Iri,
    pub has_max_age: Iri,
    pub is_smiling: Iri,
    pub has_sunglasses: Iri,
    pub is_feeling: Iri,
    pub has_scene: Iri,
    pub is_described_by: Iri,
    pub has_parent: Iri,

    // text vocabulary
    pub text: Iri,
    pub entity_collection: Iri,
    pub entity: Iri,
    pub sentiment: Iri,
    pub has_entity_collection: Iri,
    pub has_entity: Iri,
    pub has_sentiment: Iri,
}

impl Ontology {
    /// Build the vocabulary under `base_namespace`.
    ///
    /// The namespace must itself be a valid IRI; a trailing slash is added
    /// when missing so composed terms never fuse with the authority part.
    pub fn new(base_namespace: &str) -> Result<Self> {
        Iri::parse(base_namespace)?;
        let base = if base_namespace.ends_with('/') {
            base_namespace.to_string()
        } else {
            format!("{}/", base_namespace)
        };

        let term = |path: &str| Iri::from_trusted(format!("{}{}", base, path));

        Ok(Self {
            rdf_type: Iri::from_trusted(format!("{}type", RDF_NS)),
            rdfs_label: Iri::from_trusted(format!("{}label", RDFS_NS)),
            rdfs_sub_class_of: Iri::from_trusted(format!("{}subClassOf", RDFS_NS)),

            selfie: term("selfie"),
            face_detail: term("selfie/faceDetail"),
            scene: term("selfie/scene"),
            has_face_detail: term("selfie/hasFaceDetail"),
            is_gender: term("selfie/faceDetail/isGender"),
            has_min_age: term("selfie/faceDetail/hasMinAge"),
            has_max_age: term("selfie/faceDetail/hasMaxAge"),
            is_smiling: term("selfie/faceDetail/isSmiling"),
            has_sunglasses: term("selfie/faceDetail/hasSunglasses"),
            is_feeling: term("selfie/faceDetail/isFeeling"),
            has_scene: term("selfie/hasScene"),
            is_described_by: term("selfie/scene/isDescribedBy"),
            has_parent: term("selfie/scene/hasParent"),

            text: term("text"),
            entity_collection: term("text/entityCollection"),
            entity: term("text/entityCollection/entity"),
            sentiment: term("text/sentiment"),
            has_entity_collection: term("text/hasEntityCollection"),
            has_entity: term("text/entityCollection/hasEntity"),
            has_sentiment: term("text/hasSentiment"),

            base: base.clone(),
        })
    }

    /// Base namespace with trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Canonical subject IRI for a record identifier.
    ///
    /// Deterministic: the same identifier always yields the same IRI, and
    /// distinct identifiers yield distinct IRIs because the encoding is
    /// injective.
    pub fn subject(&self, identifier: &str) -> Result<Iri> {
        self.keyed("", identifier)
    }

    /// Face detail resource for an image identifier.
    pub fn face_detail_node(&self, identifier: &str) -> Result<Iri> {
        self.keyed("selfie/faceDetail/", identifier)
    }

    /// Scene resource for an image identifier.
    pub fn scene_node(&self, identifier: &str) -> Result<Iri> {
        self.keyed("selfie/scene/", identifier)
    }

    /// Scene label resource, shared across images that carry the label.
    pub fn scene_label_node(&self, label_name: &str) -> Result<Iri> {
        self.keyed("selfie/scene/", label_name)
    }

    /// Entity collection resource for a text identifier.
    pub fn entity_collection_node(&self, identifier: &str) -> Result<Iri> {
        self.keyed("text/entityCollection/", identifier)
    }

    /// Entity resource named after an entity type. Entities of the same
    /// type collapse onto one shared resource.
    pub fn entity_node(&self, entity_type: &str) -> Result<Iri> {
        self.keyed("text/entityCollection/", &entity_type.to_lowercase())
    }

    /// Sentiment resource for a text identifier.
    pub fn sentiment_node(&self, identifier: &str) -> Result<Iri> {
        self.keyed("text/sentiment/", identifier)
    }

    /// Class IRI for a specific sentiment value.
    pub fn sentiment_class(&self, value: &str) -> Result<Iri> {
        self.keyed("text/", &value.to_lowercase())
    }

    fn keyed(&self, fixed_path: &str, raw: &str) -> Result<Iri> {
        let segment = encode_segment(raw)?;
        Iri::parse(format!("{}{}{}", self.base, fixed_path, segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ontology() -> Ontology {
        Ontology::new("http://graph-ingest/").unwrap()
    }

    #[test]
    fn test_vocabulary_terms() {
        let ont = ontology();
        assert_eq!(ont.selfie.as_str(), "http://graph-ingest/selfie");
        assert_eq!(
            ont.is_gender.as_str(),
            "http://graph-ingest/selfie/faceDetail/isGender"
        );
        assert_eq!(
            ont.rdf_type.as_str(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"
        );
    }

    #[test]
    fn test_trailing_slash_added() {
        let ont = Ontology::new("http://graph-ingest").unwrap();
        assert_eq!(ont.text.as_str(), "http://graph-ingest/text");
    }

    #[test]
    fn test_subject_is_deterministic() {
        let ont = ontology();
        let a = ont.subject("selfie.jpg").unwrap();
        let b = ont.subject("selfie.jpg").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "http://graph-ingest/selfie.jpg");
    }

    #[test]
    fn test_distinct_identifiers_distinct_subjects() {
        let ont = ontology();
        let a = ont.subject("a.jpg").unwrap();
        let b = ont.subject("b.jpg").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_subject_escapes_spaces() {
        let ont = ontology();
        let iri = ont.subject("my photo.jpg").unwrap();
        assert_eq!(iri.as_str(), "http://graph-ingest/my%20photo.jpg");
    }

    #[test]
    fn test_subject_rejects_control_characters() {
        let ont = ontology();
        assert!(ont.subject("bad\u{1}name").is_err());
        assert!(ont.subject("").is_err());
    }

    #[test]
    fn test_keyed_nodes() {
        let ont = ontology();
        assert_eq!(
            ont.face_detail_node("x.jpg").unwrap().as_str(),
            "http://graph-ingest/selfie/faceDetail/x.jpg"
        );
        assert_eq!(
            ont.scene_label_node("Human Face").unwrap().as_str(),
            "http://graph-ingest/selfie/scene/Human%20Face"
        );
        assert_eq!(
            ont.entity_node("PERSON").unwrap().as_str(),
            "http://graph-ingest/text/entityCollection/person"
        );
        assert_eq!(
            ont.sentiment_class("POSITIVE").unwrap().as_str(),
            "http://graph-ingest/text/positive"
        );
    }
}
