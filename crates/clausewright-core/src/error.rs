use thiserror::Error;

/// Per-request failure. Nothing is produced when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),
}

/// A recognizer that could not run on one input.
///
/// The draft still gets assembled, on the fallback parties.
#[derive(Debug, Error)]
#[error("entity extraction failed: {source}")]
pub struct ExtractError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl ExtractError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Failure loading or validating a clause catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document type with empty key")]
    EmptyKey,

    #[error("duplicate document type: {0}")]
    DuplicateDocumentType(String),

    #[error("keyword rule with empty keyword")]
    EmptyKeyword,

    #[error("duplicate keyword rule: {0}")]
    DuplicateKeyword(String),
}
