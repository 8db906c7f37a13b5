//! Integration tests for fact extraction
//!
//! These exercise the extraction pipeline through the public API:
//! identifier mapping, main-face and dominant-emotion selection, and the
//! full triple shapes for both record variants.

use graph_ingest::prelude::*;
use graph_ingest::records::{
    AgeRange, Attribute, BoundingBox, DetectedEntity, Emotion, FaceDetail, ParentLabel, SceneLabel,
};

fn ontology() -> Ontology {
    Ontology::new("http://graph-ingest/").unwrap()
}

fn extractor() -> FactExtractor {
    FactExtractor::new(ontology())
}

fn face(width: f64, height: f64) -> FaceDetail {
    FaceDetail {
        bounding_box: BoundingBox { width, height },
        gender: Attribute {
            value: "Male".to_string(),
        },
        age_range: AgeRange { low: 30, high: 45 },
        smile: Attribute { value: false },
        sunglasses: Attribute { value: true },
        emotions: vec![Emotion {
            emotion_type: "CALM".to_string(),
            confidence: 75.0,
        }],
    }
}

#[test]
fn canonical_uri_mapping_is_idempotent_and_injective() {
    let ont = ontology();
    assert_eq!(
        ont.subject("photo.jpg").unwrap(),
        ont.subject("photo.jpg").unwrap()
    );
    assert_ne!(
        ont.subject("photo.jpg").unwrap(),
        ont.subject("photo2.jpg").unwrap()
    );
}

#[test]
fn image_extraction_produces_expected_shape() {
    let record = ImageAnalysis {
        image_name: "group photo.jpg".to_string(),
        labels: vec![
            SceneLabel {
                name: "Crowd".to_string(),
                parents: vec![ParentLabel {
                    name: "Person".to_string(),
                }],
            },
            SceneLabel {
                name: "Beach".to_string(),
                parents: vec![],
            },
        ],
        faces_details: vec![face(0.1, 0.1), face(0.2, 0.2)],
    };

    let triples = extractor().extract_image(&record).unwrap();

    // one selfie typing on the percent-encoded subject
    let subject = "http://graph-ingest/group%20photo.jpg";
    let typings: Vec<_> = triples
        .iter()
        .filter(|t| t.subject.as_str() == subject && t.predicate.as_str().ends_with("#type"))
        .collect();
    assert_eq!(typings.len(), 1);

    // one isDescribedBy per label, one hasParent per (label, parent)
    let described = triples
        .iter()
        .filter(|t| t.predicate.as_str().ends_with("isDescribedBy"))
        .count();
    assert_eq!(described, 2);
    let parents = triples
        .iter()
        .filter(|t| t.predicate.as_str().ends_with("hasParent"))
        .count();
    assert_eq!(parents, 1);

    // exactly one main-face attribute set
    let genders = triples
        .iter()
        .filter(|t| t.predicate.as_str().ends_with("isGender"))
        .count();
    assert_eq!(genders, 1);
}

#[test]
fn main_face_selection_prefers_first_maximum() {
    // areas [10, 40, 40]: the second face must win
    let mut small = face(1.0, 10.0);
    small.gender.value = "first".to_string();
    let mut winner = face(4.0, 10.0);
    winner.gender.value = "second".to_string();
    let mut also_max = face(8.0, 5.0);
    also_max.gender.value = "third".to_string();

    let record = ImageAnalysis {
        image_name: "tie.jpg".to_string(),
        labels: vec![],
        faces_details: vec![small, winner, also_max],
    };

    let triples = extractor().extract_image(&record).unwrap();
    let gender = triples
        .iter()
        .find(|t| t.predicate.as_str().ends_with("isGender"))
        .unwrap();
    match &gender.object {
        Term::Literal {
            literal: Literal::String(value),
        } => assert_eq!(value, "second"),
        other => panic!("unexpected object {:?}", other),
    }
}

#[test]
fn dominant_emotion_tie_break_prefers_first_listed() {
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
    let record = ImageAnalysis {
        image_name: "x.jpg".to_string(),
        labels: vec![],
        faces_details: vec![f],
    };

    let triples = extractor().extract_image(&record).unwrap();
    let feeling = triples
        .iter()
        .find(|t| t.predicate.as_str().ends_with("isFeeling"))
        .unwrap();
    match &feeling.object {
        Term::Literal {
            literal: Literal::String(value),
        } => assert_eq!(value, "happy"),
        other => panic!("unexpected object {:?}", other),
    }
}

#[test]
fn invalid_identifier_produces_no_triples() {
    let record = ImageAnalysis {
        image_name: "bad\u{7}.jpg".to_string(),
        labels: vec![],
        faces_details: vec![],
    };
    let err = extractor().extract_image(&record).unwrap_err();
    assert!(matches!(err, IngestError::InvalidIdentifier { .. }));
}

#[test]
fn text_extraction_matches_reference_scenario() {
    let record = TextAnalysis {
        id: "t1".to_string(),
        entities: vec![DetectedEntity {
            entity_type: Attribute {
                value: "PERSON".to_string(),
            },
            text: None,
        }],
        sentiment: Attribute {
            value: "POSITIVE".to_string(),
        },
    };

    let triples = extractor().extract_text(&record).unwrap();
    assert_eq!(triples.len(), 9);

    let expect_iri = |s: &str, p: &str, o: &str| {
        assert!(
            triples.iter().any(|t| {
                t.subject.as_str() == s
                    && t.predicate.as_str() == p
                    && matches!(&t.object, Term::Iri { iri } if iri.as_str() == o)
            }),
            "missing triple <{}> <{}> <{}>",
            s,
            p,
            o
        );
    };

    expect_iri(
        "http://graph-ingest/t1",
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
        "http://graph-ingest/text",
    );
    expect_iri(
        "http://graph-ingest/text/entityCollection/t1",
        "http://graph-ingest/text/entityCollection/hasEntity",
        "http://graph-ingest/text/entityCollection/person",
    );
    expect_iri(
        "http://graph-ingest/text/positive",
        "http://www.w3.org/2000/01/rdf-schema#subClassOf",
        "http://graph-ingest/text/sentiment",
    );
}

#[test]
fn extraction_output_is_deterministic() {
    let record = DetectionRecord::from_json(
        br#"{"id": "t9", "entities": [{"type": {"value": "LOCATION"}}], "sentiment": {"value": "MIXED"}}"#,
    )
    .unwrap();
    let first = extractor().extract(&record).unwrap();
    let second = extractor().extract(&record).unwrap();
    assert_eq!(first, second);
}
