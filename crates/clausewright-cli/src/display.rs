//! Plain-text listings for the catalog and recognizer output.

use std::fmt::Write;

use clausewright_core::{Catalog, Entity};

const KEY_WIDTH: usize = 14;
const NAME_WIDTH: usize = 30;

/// Document types then keyword rules, each in table order.
pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Document types");
    for doc in catalog.documents() {
        let _ = writeln!(
            out,
            "  {:<KEY_WIDTH$} {:<NAME_WIDTH$} {} clauses",
            doc.key,
            doc.name,
            doc.sections.len()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Keyword rules");
    if catalog.keyword_rules().is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for rule in catalog.keyword_rules() {
        let _ = writeln!(
            out,
            "  {:<KEY_WIDTH$} {} clauses",
            rule.keyword,
            rule.clauses.len()
        );
    }

    out
}

/// One `LABEL  text` line per entity.
pub fn render_entities(entities: &[Entity]) -> String {
    if entities.is_empty() {
        return "(no entities)\n".to_string();
    }
    let mut out = String::new();
    for entity in entities {
        let _ = writeln!(out, "  {:<8} {}", entity.label.as_str(), entity.text);
    }
    out
}
