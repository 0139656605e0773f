//! Draft assembly: header from recognised parties, body from augmented clauses.

use tracing::{debug, warn};

use crate::augment::augment;
use crate::catalog::Catalog;
use crate::entity::{Entity, EntityExtractor};
use crate::error::DraftError;
use crate::parties::resolve_header;

const SECTION_SEPARATOR: &str = "\n\n";
const HEADER_SEPARATOR: &str = "\n\n\n";

/// One assembled draft with the metadata that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftResult {
    pub draft: String,
    /// Entities exactly as the recognizer returned them.
    pub entities: Vec<Entity>,
    /// Keywords that fired, in rule-table order.
    pub triggered_keywords: Vec<String>,
    /// The recognizer failed on this input and the header fell back to the
    /// default parties.
    pub extraction_failed: bool,
}

impl DraftResult {
    pub fn triggered_count(&self) -> usize {
        self.triggered_keywords.len()
    }
}

/// Assembles drafts from a catalog and a recognizer.
///
/// Holds no per-request state; share one instance behind an `Arc` and call
/// [`generate`](Self::generate) from any thread.
pub struct DocumentAssembler<E> {
    catalog: Catalog,
    extractor: E,
}

impl<E: EntityExtractor> DocumentAssembler<E> {
    pub fn new(catalog: Catalog, extractor: E) -> Self {
        Self { catalog, extractor }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Assemble a draft of `document_type` personalised from `requirements`.
    ///
    /// The document type is checked before the recognizer runs, so an
    /// unknown type costs nothing and yields no partial output.
    pub fn generate(
        &self,
        document_type: &str,
        requirements: &str,
    ) -> Result<DraftResult, DraftError> {
        self.catalog.document(document_type)?;

        let (entities, extraction_failed) = match self.extractor.try_extract(requirements) {
            Ok(entities) => (entities, false),
            Err(err) => {
                warn!(document_type, %err, "drafting with fallback parties");
                (Vec::new(), true)
            }
        };
        let header = resolve_header(&self.catalog, document_type, &entities)?;
        let augmentation = augment(&self.catalog, document_type, requirements)?;

        let body = augmentation.sections.join(SECTION_SEPARATOR);
        let draft = format!("{header}{HEADER_SEPARATOR}{body}");

        debug!(
            document_type,
            entities = entities.len(),
            sections = augmentation.sections.len(),
            keywords = ?augmentation.triggered_keywords,
            "assembled draft"
        );

        Ok(DraftResult {
            draft,
            entities,
            triggered_keywords: augmentation.triggered_keywords,
            extraction_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DocumentType, KeywordRule};
    use crate::entity::EntityLabel;
    use crate::error::ExtractError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed entity list regardless of input.
    struct FixedExtractor(Vec<Entity>);

    impl EntityExtractor for FixedExtractor {
        fn extract(&self, _text: &str) -> Vec<Entity> {
            self.0.clone()
        }
    }

    /// Returns nothing and counts invocations.
    #[derive(Default)]
    struct CountingExtractor(AtomicUsize);

    impl EntityExtractor for CountingExtractor {
        fn extract(&self, _text: &str) -> Vec<Entity> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }
    }

    /// A recognizer whose backend errors on every input.
    struct FailingExtractor;

    impl EntityExtractor for FailingExtractor {
        fn extract(&self, _text: &str) -> Vec<Entity> {
            Vec::new()
        }

        fn try_extract(&self, _text: &str) -> Result<Vec<Entity>, ExtractError> {
            Err(ExtractError::new("session closed"))
        }
    }

    fn ent(text: &str, tag: &str) -> Entity {
        Entity::new(text, EntityLabel::from_tag(tag))
    }

    fn builtin(extractor: FixedExtractor) -> DocumentAssembler<FixedExtractor> {
        DocumentAssembler::new(Catalog::builtin(), extractor)
    }

    fn empty() -> DocumentAssembler<FixedExtractor> {
        builtin(FixedExtractor(Vec::new()))
    }

    #[test]
    fn empty_requirements_give_defaults_for_every_type() {
        let assembler = empty();
        for doc in assembler.catalog().documents() {
            let result = assembler.generate(&doc.key, "").unwrap();
            let (header, body) = result.draft.split_once(HEADER_SEPARATOR).unwrap();

            assert_eq!(header.matches("Party A").count(), 1, "{}", doc.key);
            assert_eq!(header.matches("Party B").count(), 1, "{}", doc.key);
            assert_eq!(header.matches("India").count(), 1, "{}", doc.key);
            assert_eq!(body.split(SECTION_SEPARATOR).count(), doc.sections.len());
            assert!(!body.contains("Additional Clause"));
            assert!(result.triggered_keywords.is_empty());
            assert_eq!(result.triggered_count(), 0);
        }
    }

    #[test]
    fn draft_layout_is_exact() {
        let catalog = Catalog::new(
            vec![DocumentType {
                key: "memo".into(),
                name: "Memo".into(),
                sections: vec!["1. One".into(), "2. Two".into()],
            }],
            vec![KeywordRule {
                keyword: "extra".into(),
                clauses: vec!["3. Extra".into()],
            }],
        )
        .unwrap();
        let assembler = DocumentAssembler::new(catalog, FixedExtractor(Vec::new()));
        let result = assembler.generate("memo", "needs EXTRA").unwrap();
        assert_eq!(
            result.draft,
            "Memo\n\n\
             This Memo (\"Agreement\") is made between Party A and Party B. \
             This Agreement shall be governed by the laws of India.\
             \n\n\n1. One\n\n2. Two\n\n3. Extra"
        );
        assert_eq!(result.triggered_keywords, ["extra"]);
    }

    #[test]
    fn identical_inputs_identical_output() {
        let assembler = builtin(FixedExtractor(vec![ent("Acme Corp", "ORG")]));
        let text = "Startup NDA with a remote intern";
        let first = assembler.generate("nda", text).unwrap();
        let second = assembler.generate("nda", text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn startup_triggers_once_in_any_case() {
        let assembler = empty();
        for text in ["STARTUP", "Startup", "startup"] {
            let result = assembler.generate("nda", text).unwrap();
            assert_eq!(result.triggered_keywords, ["startup"]);
            assert_eq!(result.draft.matches("In a startup context").count(), 1);
        }
    }

    #[test]
    fn remote_and_intern_both_trigger() {
        let result = empty()
            .generate("employment", "Hiring an intern who will work remote")
            .unwrap();
        assert_eq!(result.triggered_keywords, ["remote", "intern"]);
        assert_eq!(result.triggered_count(), 2);

        let remote = result.draft.find("performed remotely").unwrap();
        let intern = result.draft.find("relates to an intern").unwrap();
        assert!(remote < intern);
    }

    #[test]
    fn triggered_clause_in_base_appears_once() {
        let shared = "Shared clause text";
        let catalog = Catalog::new(
            vec![DocumentType {
                key: "nda".into(),
                name: "NDA".into(),
                sections: vec![shared.into()],
            }],
            vec![KeywordRule {
                keyword: "remote".into(),
                clauses: vec![shared.into()],
            }],
        )
        .unwrap();
        let assembler = DocumentAssembler::new(catalog, FixedExtractor(Vec::new()));
        let result = assembler.generate("nda", "remote").unwrap();
        assert_eq!(result.draft.matches(shared).count(), 1);
        assert_eq!(result.triggered_count(), 1);
    }

    #[test]
    fn parties_from_extracted_entities() {
        let entities = vec![
            ent("Acme Corp", "ORG"),
            ent("NDA", "ORG"),
            ent("Jane Doe", "PERSON"),
            ent("Berlin", "GPE"),
        ];
        let result = builtin(FixedExtractor(entities.clone()))
            .generate("nda", "ignored by the fixed extractor")
            .unwrap();
        assert!(result.draft.contains(
            "is made between Acme Corp and Jane Doe. \
             This Agreement shall be governed by the laws of Berlin."
        ));
        assert_eq!(result.entities, entities);
    }

    #[test]
    fn unknown_type_fails_without_running_recognizer() {
        let assembler = DocumentAssembler::new(Catalog::builtin(), CountingExtractor::default());
        let err = assembler.generate("lease", "startup").unwrap_err();
        assert_eq!(err, DraftError::UnknownDocumentType("lease".into()));
        assert_eq!(assembler.extractor().0.load(Ordering::SeqCst), 0);

        assembler.generate("nda", "").unwrap();
        assert_eq!(assembler.extractor().0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shared_across_threads() {
        let assembler = Arc::new(builtin(FixedExtractor(vec![ent("Jane Doe", "PERSON")])));
        let expected = assembler.generate("nda", "remote startup").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let assembler = Arc::clone(&assembler);
                std::thread::spawn(move || assembler.generate("nda", "remote startup").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn boxed_extractor_works() {
        let extractor: Box<dyn EntityExtractor> =
            Box::new(FixedExtractor(vec![ent("Globex Ltd", "ORG")]));
        let assembler = DocumentAssembler::new(Catalog::builtin(), extractor);
        let result = assembler.generate("employment", "").unwrap();
        assert!(result.draft.contains("between Globex Ltd and Party B"));
    }

    #[test]
    fn failed_extraction_is_flagged() {
        let extractor: Box<dyn EntityExtractor> = Box::new(FailingExtractor);
        let assembler = DocumentAssembler::new(Catalog::builtin(), extractor);
        let result = assembler
            .generate("nda", "Startup NDA between Acme Corp and Jane Doe")
            .unwrap();
        assert!(result.extraction_failed);
        assert!(result.entities.is_empty());
        assert!(result.draft.contains("between Party A and Party B"));
        assert_eq!(result.triggered_keywords, ["startup"]);
    }

    #[test]
    fn successful_extraction_not_flagged() {
        let result = empty().generate("nda", "").unwrap();
        assert!(!result.extraction_failed);
    }

    #[test]
    fn extract_error_names_cause() {
        let err = ExtractError::new("session closed");
        assert_eq!(err.to_string(), "entity extraction failed: session closed");
        assert!(std::error::Error::source(&err).is_some());
    }
}
