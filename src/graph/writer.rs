//! Export serializations
//!
//! Human-consumable renderings of a loaded graph for the export endpoint:
//! Turtle and RDF/XML, the two formats the export surface accepts.

use crate::graph::triple::{Term, Triple};
use crate::ontology::{Iri, RDF_NS, RDFS_NS, XSD_NS};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Turtle,
    RdfXml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::RdfXml => "rdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Turtle => "text/turtle",
            Self::RdfXml => "application/rdf+xml",
        }
    }

    /// Render a graph in this format.
    pub fn write<'a>(&self, triples: impl IntoIterator<Item = &'a Triple>) -> String {
        match self {
            Self::Turtle => write_turtle(triples),
            Self::RdfXml => write_rdf_xml(triples),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ttl" => Ok(Self::Turtle),
            "rdf" => Ok(Self::RdfXml),
            other => Err(format!("unsupported export type: {:?}", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn group_by_subject<'a>(
    triples: impl IntoIterator<Item = &'a Triple>,
) -> IndexMap<&'a Iri, Vec<&'a Triple>> {
    let mut groups: IndexMap<&Iri, Vec<&Triple>> = IndexMap::new();
    for triple in triples {
        groups.entry(&triple.subject).or_default().push(triple);
    }
    groups
}

fn turtle_predicate(iri: &Iri) -> String {
    let s = iri.as_str();
    if let Some(local) = s.strip_prefix(RDF_NS) {
        if local == "type" {
            return "a".to_string();
        }
        return format!("rdf:{}", local);
    }
    if let Some(local) = s.strip_prefix(RDFS_NS) {
        return format!("rdfs:{}", local);
    }
    format!("<{}>", s)
}

fn turtle_object(term: &Term) -> String {
    match term {
        Term::Iri { iri } => format!("<{}>", iri),
        Term::Literal { literal } => {
            let datatype = literal.datatype();
            let lexical = escape_turtle(&literal.lexical());
            match datatype.strip_prefix(XSD_NS) {
                Some("string") => format!("\"{}\"", lexical),
                Some(local) => format!("\"{}\"^^xsd:{}", lexical, local),
                None => format!("\"{}\"^^<{}>", lexical, datatype),
            }
        }
    }
}

fn escape_turtle(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Render a graph as Turtle, grouped by subject.
pub fn write_turtle<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> String {
    let mut out = String::new();
    out.push_str(&format!("@prefix rdf: <{}> .\n", RDF_NS));
    out.push_str(&format!("@prefix rdfs: <{}> .\n", RDFS_NS));
    out.push_str(&format!("@prefix xsd: <{}> .\n\n", XSD_NS));

    for (subject, group) in group_by_subject(triples) {
        out.push_str(&format!("<{}>", subject));
        for (i, triple) in group.iter().enumerate() {
            let sep = if i == 0 { " " } else { " ;\n    " };
            out.push_str(sep);
            out.push_str(&turtle_predicate(&triple.predicate));
            out.push(' ');
            out.push_str(&turtle_object(&triple.object));
        }
        out.push_str(" .\n");
    }
    out
}

fn split_iri(iri: &Iri) -> (&str, &str) {
    let s = iri.as_str();
    let split = s
        .rfind('#')
        .map(|i| i + 1)
        .or_else(|| s.rfind('/').map(|i| i + 1))
        .unwrap_or(0);
    (&s[..split], &s[split..])
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a graph as RDF/XML.
///
/// Predicate namespaces are collected up front and declared on the root
/// element; the fixed vocabulary guarantees XML-safe local names.
pub fn write_rdf_xml<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> String {
    let groups = group_by_subject(triples);

    let mut namespaces: IndexMap<&str, String> = IndexMap::new();
    namespaces.insert(RDF_NS, "rdf".to_string());
    for group in groups.values() {
        for triple in group {
            let (ns, _) = split_iri(&triple.predicate);
            let next = format!("ns{}", namespaces.len());
            namespaces.entry(ns).or_insert(next);
        }
    }

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<rdf:RDF");
    for (ns, prefix) in &namespaces {
        out.push_str(&format!("\n    xmlns:{}=\"{}\"", prefix, escape_xml(ns)));
    }
    out.push_str(">\n");

    for (subject, group) in &groups {
        out.push_str(&format!(
            "  <rdf:Description rdf:about=\"{}\">\n",
            escape_xml(subject.as_str())
        ));
        for triple in group {
            let (ns, local) = split_iri(&triple.predicate);
            let prefix = &namespaces[ns];
            match &triple.object {
                Term::Iri { iri } => out.push_str(&format!(
                    "    <{}:{} rdf:resource=\"{}\"/>\n",
                    prefix,
                    local,
                    escape_xml(iri.as_str())
                )),
                Term::Literal { literal } => out.push_str(&format!(
                    "    <{}:{} rdf:datatype=\"{}\">{}</{}:{}>\n",
                    prefix,
                    local,
                    escape_xml(&literal.datatype()),
                    escape_xml(&literal.lexical()),
                    prefix,
                    local
                )),
            }
        }
        out.push_str("  </rdf:Description>\n");
    }
    out.push_str("</rdf:RDF>\n");
    out
}
