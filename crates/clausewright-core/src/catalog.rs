//! Clause library and keyword rule table.
//!
//! Both tables are ordered and immutable once built. A [`Catalog`] is loaded
//! once at startup (built-in or from JSON) and shared read-only by every
//! request.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::builtin;
use crate::error::{CatalogError, DraftError};

/// A document type: display name plus its base clauses in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    pub key: String,
    pub name: String,
    pub sections: Vec<String>,
}

/// Extra clauses appended when `keyword` occurs anywhere in the requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Stored lower-cased; matched against lower-cased text.
    pub keyword: String,
    pub clauses: Vec<String>,
}

/// The clause library and keyword rule table.
///
/// Rule order is observable: triggered keywords are reported, and extra
/// clauses appended, in the order rules appear here.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    documents: Vec<DocumentType>,
    keyword_rules: Vec<KeywordRule>,
}

#[derive(Deserialize)]
struct RawCatalog {
    documents: Vec<DocumentType>,
    #[serde(default)]
    keyword_rules: Vec<KeywordRule>,
}

impl Catalog {
    /// Build a catalog, validating keys and lower-casing keywords.
    pub fn new(
        documents: Vec<DocumentType>,
        keyword_rules: Vec<KeywordRule>,
    ) -> Result<Self, CatalogError> {
        let mut keys = HashSet::new();
        for doc in &documents {
            if doc.key.trim().is_empty() {
                return Err(CatalogError::EmptyKey);
            }
            if !keys.insert(doc.key.as_str()) {
                return Err(CatalogError::DuplicateDocumentType(doc.key.clone()));
            }
        }

        let mut keyword_rules = keyword_rules;
        let mut seen = HashSet::new();
        for rule in &mut keyword_rules {
            rule.keyword = rule.keyword.to_lowercase();
            if rule.keyword.trim().is_empty() {
                return Err(CatalogError::EmptyKeyword);
            }
            if !seen.insert(rule.keyword.clone()) {
                return Err(CatalogError::DuplicateKeyword(rule.keyword.clone()));
            }
        }

        Ok(Self {
            documents,
            keyword_rules,
        })
    }

    /// The built-in NDA and employment library with the startup/remote/intern rules.
    pub fn builtin() -> Self {
        Self {
            documents: builtin::document_types(),
            keyword_rules: builtin::keyword_rules(),
        }
    }

    /// Parse a catalog from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Self::new(raw.documents, raw.keyword_rules)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            documents = catalog.documents.len(),
            keyword_rules = catalog.keyword_rules.len(),
            "loaded clause catalog"
        );
        Ok(catalog)
    }

    /// Look up a document type by key.
    pub fn document(&self, key: &str) -> Result<&DocumentType, DraftError> {
        self.documents
            .iter()
            .find(|doc| doc.key == key)
            .ok_or_else(|| DraftError::UnknownDocumentType(key.to_string()))
    }

    pub fn documents(&self) -> &[DocumentType] {
        &self.documents
    }

    pub fn keyword_rules(&self) -> &[KeywordRule] {
        &self.keyword_rules
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
