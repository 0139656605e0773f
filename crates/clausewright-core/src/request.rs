//! Wire shapes for the request handler.
//!
//! Field names match the JSON API: `docType` in, `adaptive_count` out.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assembler::{DocumentAssembler, DraftResult};
use crate::entity::{Entity, EntityExtractor};
use crate::error::DraftError;

pub const DEFAULT_DOC_TYPE: &str = "nda";

/// An incoming draft request. Absent or `null` fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRequest {
    #[serde(rename = "docType", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

impl DraftRequest {
    pub fn new(doc_type: impl Into<String>, requirements: impl Into<String>) -> Self {
        Self {
            doc_type: Some(doc_type.into()),
            requirements: Some(requirements.into()),
        }
    }

    pub fn doc_type(&self) -> &str {
        self.doc_type.as_deref().unwrap_or(DEFAULT_DOC_TYPE)
    }

    pub fn requirements(&self) -> &str {
        self.requirements.as_deref().unwrap_or_default()
    }
}

/// A successful draft, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftResponse {
    pub draft: String,
    pub entities: Vec<Entity>,
    pub keywords: Vec<String>,
    pub adaptive_count: usize,
}

impl From<DraftResult> for DraftResponse {
    fn from(result: DraftResult) -> Self {
        let adaptive_count = result.triggered_count();
        Self {
            draft: result.draft,
            entities: result.entities,
            keywords: result.triggered_keywords,
            adaptive_count,
        }
    }
}

/// A rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&DraftError> for ErrorResponse {
    fn from(err: &DraftError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Serve one request against `assembler`.
pub fn handle<E: EntityExtractor>(
    assembler: &DocumentAssembler<E>,
    request: &DraftRequest,
) -> Result<DraftResponse, DraftError> {
    assembler
        .generate(request.doc_type(), request.requirements())
        .map(DraftResponse::from)
        .inspect_err(|err| warn!(doc_type = request.doc_type(), %err, "rejected draft request"))
}
