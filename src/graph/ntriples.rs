//! N-Triples serialization and parsing
//!
//! This is the wire format exchanged with the remote store: graph loads
//! come back as N-Triples, and updates embed the same term syntax inside
//! SPARQL `INSERT DATA` / `DELETE DATA` blocks.

use crate::error::{IngestError, Result};
use crate::graph::triple::{Literal, Term, Triple};
use crate::ontology::{Iri, XSD_NS};

/// Serialize one triple as an N-Triples statement, without the trailing
/// newline.
pub fn write_triple(triple: &Triple) -> String {
    format!(
        "<{}> <{}> {} .",
        triple.subject,
        triple.predicate,
        write_term(&triple.object)
    )
}

/// Serialize a term in N-Triples syntax.
pub fn write_term(term: &Term) -> String {
    match term {
        Term::Iri { iri } => format!("<{}>", iri),
        Term::Literal { literal } => format!(
            "\"{}\"^^<{}>",
            escape_literal(&literal.lexical()),
            literal.datatype()
        ),
    }
}

/// Serialize a whole document.
pub fn write_document<'a>(triples: impl IntoIterator<Item = &'a Triple>) -> String {
    let mut out = String::new();
    for triple in triples {
        out.push_str(&write_triple(triple));
        out.push('\n');
    }
    out
}

/// Parse an N-Triples document into triples.
///
/// Handles the subset the store produces for our graphs: IRI subjects and
/// predicates, IRI or literal objects (plain literals read as strings).
/// Blank nodes are rejected; nothing in these graphs produces them.
pub fn parse_document(input: &str) -> Result<Vec<Triple>> {
    let mut triples = Vec::new();
    for (line_no, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        triples.push(
            parse_statement(line)
                .map_err(|e| IngestError::Parse(format!("line {}: {}", line_no + 1, e)))?,
        );
    }
    Ok(triples)
}

fn parse_statement(line: &str) -> std::result::Result<Triple, String> {
    let mut rest = line;

    let subject = parse_iri(&mut rest)?;
    skip_ws(&mut rest);
    let predicate = parse_iri(&mut rest)?;
    skip_ws(&mut rest);
    let object = parse_object(&mut rest)?;
    skip_ws(&mut rest);

    if !rest.starts_with('.') {
        return Err("statement does not end with '.'".to_string());
    }

    Ok(Triple::new(subject, predicate, object))
}

fn skip_ws(rest: &mut &str) {
    *rest = rest.trim_start();
}

fn parse_iri(rest: &mut &str) -> std::result::Result<Iri, String> {
    if !rest.starts_with('<') {
        if rest.starts_with("_:") {
            return Err("blank nodes are not supported".to_string());
        }
        return Err(format!("expected IRI at {:?}", rest.chars().take(20).collect::<String>()));
    }
    let end = rest.find('>').ok_or("unterminated IRI")?;
    let value = &rest[1..end];
    *rest = &rest[end + 1..];
    Iri::parse(value).map_err(|e| e.to_string())
}

fn parse_object(rest: &mut &str) -> std::result::Result<Term, String> {
    if rest.starts_with('<') {
        return Ok(Term::iri(parse_iri(rest)?));
    }
    if rest.starts_with("_:") {
        return Err("blank nodes are not supported".to_string());
    }
    if !rest.starts_with('"') {
        return Err("expected IRI or literal in object position".to_string());
    }

    let lexical = parse_quoted(rest)?;

    // optional datatype or language tag
    if rest.starts_with("^^") {
        *rest = &rest[2..];
        let datatype = parse_iri(rest)?;
        return Ok(typed_literal(lexical, datatype.as_str()));
    }
    if rest.starts_with('@') {
        // language-tagged strings are read as plain strings
        let end = rest
            .find(|c: char| c.is_whitespace())
            .unwrap_or(rest.len());
        *rest = &rest[end..];
    }
    Ok(Term::string(lexical))
}

fn parse_quoted(rest: &mut &str) -> std::result::Result<String, String> {
    debug_assert!(rest.starts_with('"'));
    let mut out = String::new();
    let mut chars = rest[1..].char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                *rest = &rest[1 + i + 1..];
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, esc)) if esc == 'u' || esc == 'U' => {
                    let width = if esc == 'u' { 4 } else { 8 };
                    let mut code = String::new();
                    for _ in 0..width {
                        match chars.next() {
                            Some((_, h)) => code.push(h),
                            None => return Err("truncated unicode escape".to_string()),
                        }
                    }
                    let value = u32::from_str_radix(&code, 16)
                        .map_err(|_| "invalid unicode escape".to_string())?;
                    out.push(char::from_u32(value).ok_or("invalid unicode escape")?);
                }
                _ => return Err("invalid escape sequence".to_string()),
            },
            other => out.push(other),
        }
    }
    Err("unterminated literal".to_string())
}

fn typed_literal(lexical: String, datatype: &str) -> Term {
    if datatype == format!("{}integer", XSD_NS) || datatype == format!("{}int", XSD_NS) {
        if let Ok(value) = lexical.parse::<i64>() {
            return Term::integer(value);
        }
    }
    if datatype == format!("{}boolean", XSD_NS) {
        match lexical.as_str() {
            "true" | "1" => return Term::boolean(true),
            "false" | "0" => return Term::boolean(false),
            _ => {}
        }
    }
    Term::Literal {
        literal: Literal::String(lexical),
    }
}

fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
