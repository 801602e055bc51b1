use std::fmt;

use serde::{Deserialize, Serialize};

/// Category label attached to a recognized span.
///
/// Only [`EntityCategory::Disease`] and [`EntityCategory::Chemical`] are
/// consumed downstream; any other label a recognizer emits is carried as
/// [`EntityCategory::Other`] and ignored by the filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    Disease,
    Chemical,
    Other(String),
}

impl EntityCategory {
    /// Map a recognizer label to a category.
    ///
    /// Matching is case-insensitive and ignores a BIO prefix, so `DISEASE`,
    /// `Disease` and `B-Disease` all map to [`EntityCategory::Disease`].
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        let bare = trimmed
            .strip_prefix("B-")
            .or_else(|| trimmed.strip_prefix("I-"))
            .unwrap_or(trimmed);
        if bare.eq_ignore_ascii_case("DISEASE") {
            Self::Disease
        } else if bare.eq_ignore_ascii_case("CHEMICAL") {
            Self::Chemical
        } else {
            Self::Other(bare.to_uppercase())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Disease => "DISEASE",
            Self::Chemical => "CHEMICAL",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A span emitted by an entity recognizer: surface text plus category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    /// Verbatim surface form.
    pub text: String,
    pub category: EntityCategory,
}

impl RecognizedEntity {
    pub fn new(text: impl Into<String>, category: EntityCategory) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    pub fn disease(text: impl Into<String>) -> Self {
        Self::new(text, EntityCategory::Disease)
    }

    pub fn chemical(text: impl Into<String>) -> Self {
        Self::new(text, EntityCategory::Chemical)
    }
}

/// Disease and medication mentions after stoplist filtering and
/// order-preserving de-duplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredEntities {
    pub diseases: Vec<String>,
    pub medications: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_accepts_common_spellings() {
        assert_eq!(EntityCategory::from_label("DISEASE"), EntityCategory::Disease);
        assert_eq!(EntityCategory::from_label("Disease"), EntityCategory::Disease);
        assert_eq!(EntityCategory::from_label("B-Chemical"), EntityCategory::Chemical);
        assert_eq!(EntityCategory::from_label("I-Chemical"), EntityCategory::Chemical);
    }

    #[test]
    fn from_label_keeps_unknown_categories() {
        assert_eq!(
            EntityCategory::from_label("gene"),
            EntityCategory::Other("GENE".to_string())
        );
        assert_eq!(EntityCategory::from_label("gene").label(), "GENE");
    }
}
