//! IRI newtype and identifier encoding

use crate::error::{IngestError, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Characters escaped when a raw identifier becomes a single IRI path
/// segment. Everything in this set is percent-encoded exactly once;
/// `%` itself is included so pre-encoded input cannot alias.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'[')
    .add(b']')
    .add(b'%')
    .add(b'/');

/// A validated IRI.
///
/// Equality and hashing are structural over the full text, which is what
/// triple equality needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Parse and validate an absolute IRI.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        Url::parse(&value).map_err(|e| IngestError::InvalidIdentifier {
            identifier: value.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self(value))
    }

    /// Build an IRI from pre-validated constant parts. Only for use with
    /// namespace constants joined to fixed vocabulary paths.
    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Percent-encode a raw identifier into a single IRI path segment.
///
/// Applied exactly once per raw segment; composed IRIs never re-encode.
/// Fails on identifiers that cannot become a valid segment: empty strings
/// and strings containing control characters.
pub fn encode_segment(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(IngestError::InvalidIdentifier {
            identifier: raw.to_string(),
            reason: "identifier is empty".to_string(),
        });
    }
    if raw.chars().any(|c| c.is_control()) {
        return Err(IngestError::InvalidIdentifier {
            identifier: raw.to_string(),
            reason: "identifier contains control characters".to_string(),
        });
    }
    Ok(utf8_percent_encode(raw, SEGMENT).to_string())
}
