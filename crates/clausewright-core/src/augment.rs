//! Keyword-triggered clause augmentation.

use crate::catalog::Catalog;
use crate::error::DraftError;

/// Working section list for one draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Augmentation {
    /// Base clauses followed by any appended extras.
    pub sections: Vec<String>,
    /// Keywords that fired, in rule-table order.
    pub triggered_keywords: Vec<String>,
    base_len: usize,
}

impl Augmentation {
    /// Clauses appended on top of the document type's base clauses.
    pub fn extra_sections(&self) -> &[String] {
        &self.sections[self.base_len..]
    }
}

/// Append the clauses of every rule whose keyword occurs in `text`.
///
/// Matching is case-insensitive substring containment, so `intern` also
/// fires on "international". Each rule fires at most once. A clause whose
/// exact text is already in the working list is not appended again.
pub fn augment(
    catalog: &Catalog,
    document_type: &str,
    text: &str,
) -> Result<Augmentation, DraftError> {
    let doc = catalog.document(document_type)?;
    let mut sections = doc.sections.clone();
    let base_len = sections.len();
    let lowered = text.to_lowercase();

    let mut triggered_keywords = Vec::new();
    for rule in catalog.keyword_rules() {
        if !lowered.contains(rule.keyword.as_str()) {
            continue;
        }
        triggered_keywords.push(rule.keyword.clone());
        for clause in &rule.clauses {
            if !sections.contains(clause) {
                sections.push(clause.clone());
            }
        }
    }

    Ok(Augmentation {
        sections,
        triggered_keywords,
        base_len,
    })
}
