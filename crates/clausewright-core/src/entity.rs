//! Named entities and the recognizer seam.
//!
//! The assembler never looks inside a recognizer: it hands over the raw
//! requirements text and gets back labelled spans in document order.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Category tag attached to a recognised span.
///
/// Tags follow the OntoNotes conventions used by common NER models. Anything
/// the party resolver does not care about is kept verbatim in [`Other`](Self::Other).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    /// `ORG`: companies, agencies, institutions.
    Organization,
    /// `PERSON`: people, including fictional.
    Person,
    /// `GPE`: countries, cities, states.
    GeoPolitical,
    /// `LOC`: non-GPE locations.
    Location,
    Other(String),
}

impl EntityLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Organization => "ORG",
            Self::Person => "PERSON",
            Self::GeoPolitical => "GPE",
            Self::Location => "LOC",
            Self::Other(tag) => tag,
        }
    }

    /// Parse a recognizer tag. CoNLL-style `PER` is folded into `PERSON`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ORG" => Self::Organization,
            "PERSON" | "PER" => Self::Person,
            "GPE" => Self::GeoPolitical,
            "LOC" => Self::Location,
            other => Self::Other(other.to_string()),
        }
    }

    /// True for labels that can name a governing jurisdiction.
    pub fn is_place(&self) -> bool {
        matches!(self, Self::GeoPolitical | Self::Location)
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EntityLabel {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

/// A labelled span of source text.
///
/// Serialises as a `[text, label]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, EntityLabel)", into = "(String, EntityLabel)")]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

impl From<(String, EntityLabel)> for Entity {
    fn from((text, label): (String, EntityLabel)) -> Self {
        Self { text, label }
    }
}

impl From<Entity> for (String, EntityLabel) {
    fn from(entity: Entity) -> Self {
        (entity.text, entity.label)
    }
}

/// A named-entity recognizer.
///
/// Implementations must be reentrant: one instance is built at startup and
/// shared by every request. A recognizer that cannot run at all should have
/// failed to construct.
pub trait EntityExtractor: Send + Sync {
    /// Entities in `text`, left to right. Empty text yields an empty list.
    fn extract(&self, text: &str) -> Vec<Entity>;

    /// Like [`extract`](Self::extract), but reports a per-input failure
    /// instead of answering with no entities.
    fn try_extract(&self, text: &str) -> Result<Vec<Entity>, ExtractError> {
        Ok(self.extract(text))
    }
}

impl<T: EntityExtractor + ?Sized> EntityExtractor for Arc<T> {
    fn extract(&self, text: &str) -> Vec<Entity> {
        (**self).extract(text)
    }

    fn try_extract(&self, text: &str) -> Result<Vec<Entity>, ExtractError> {
        (**self).try_extract(text)
    }
}

impl<T: EntityExtractor + ?Sized> EntityExtractor for Box<T> {
    fn extract(&self, text: &str) -> Vec<Entity> {
        (**self).extract(text)
    }

    fn try_extract(&self, text: &str) -> Result<Vec<Entity>, ExtractError> {
        (**self).try_extract(text)
    }
}
