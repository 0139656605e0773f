//! Party and jurisdiction resolution for the document header.
//!
//! Party A is the first organisation, Party B the first person, and the
//! governing jurisdiction the first place, each in document order. Missing
//! roles fall back to fixed placeholders so a header can always be written.

use crate::catalog::Catalog;
use crate::entity::{Entity, EntityLabel};
use crate::error::DraftError;

pub const DEFAULT_PARTY_A: &str = "Party A";
pub const DEFAULT_PARTY_B: &str = "Party B";
pub const DEFAULT_JURISDICTION: &str = "India";

/// Organisation spans that name the document itself rather than a party.
const RESERVED_ORG_PHRASES: &[&str] = &["nda", "non-disclosure agreement", "agreement"];

/// The contracting parties and governing law named in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parties {
    pub party_a: String,
    pub party_b: String,
    pub jurisdiction: String,
}

impl Default for Parties {
    fn default() -> Self {
        Self {
            party_a: DEFAULT_PARTY_A.to_string(),
            party_b: DEFAULT_PARTY_B.to_string(),
            jurisdiction: DEFAULT_JURISDICTION.to_string(),
        }
    }
}

impl Parties {
    /// Pick parties from entities: first match wins, never frequency or length.
    pub fn from_entities(entities: &[Entity]) -> Self {
        let mut organizations = Vec::new();
        let mut persons = Vec::new();
        let mut places = Vec::new();

        for entity in entities {
            let text = entity.text.trim();
            match &entity.label {
                EntityLabel::Organization => {
                    if !is_reserved_org(text) {
                        organizations.push(text);
                    }
                }
                EntityLabel::Person => persons.push(text),
                label if label.is_place() => places.push(text),
                _ => {}
            }
        }

        Self {
            party_a: first_or(&organizations, DEFAULT_PARTY_A),
            party_b: first_or(&persons, DEFAULT_PARTY_B),
            jurisdiction: first_or(&places, DEFAULT_JURISDICTION),
        }
    }
}

fn first_or(bucket: &[&str], fallback: &str) -> String {
    bucket.first().copied().unwrap_or(fallback).to_string()
}

fn is_reserved_org(text: &str) -> bool {
    let lowered = text.to_lowercase();
    RESERVED_ORG_PHRASES.contains(&lowered.as_str())
}

/// Render the header for a document named `name`.
pub fn render_header(name: &str, parties: &Parties) -> String {
    format!(
        "{name}\n\n\
         This {name} (\"Agreement\") is made between {a} and {b}. \
         This Agreement shall be governed by the laws of {j}.",
        a = parties.party_a,
        b = parties.party_b,
        j = parties.jurisdiction,
    )
}

/// Build the header for `document_type` from extracted entities.
pub fn resolve_header(
    catalog: &Catalog,
    document_type: &str,
    entities: &[Entity],
) -> Result<String, DraftError> {
    let doc = catalog.document(document_type)?;
    Ok(render_header(&doc.name, &Parties::from_entities(entities)))
}
