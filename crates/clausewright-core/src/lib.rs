//! Document assembly engine: clause catalog, party resolution, keyword
//! augmentation, and draft composition.

pub mod assembler;
pub mod augment;
mod builtin;
pub mod catalog;
pub mod entity;
mod error;
pub mod parties;
pub mod request;

pub use assembler::{DocumentAssembler, DraftResult};
pub use augment::{Augmentation, augment};
pub use catalog::{Catalog, DocumentType, KeywordRule};
pub use entity::{Entity, EntityExtractor, EntityLabel};
pub use error::{CatalogError, DraftError, ExtractError};
pub use parties::{Parties, render_header, resolve_header};
pub use request::{DraftRequest, DraftResponse, ErrorResponse, handle};
