//! Entity filtering and de-duplication.
//!
//! Surface text is never normalized: lowercasing happens only for the
//! stoplist comparisons, and output strings are the recognizer's spans
//! verbatim.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use prontuario_model::{EntityCategory, FilteredEntities, RecognizedEntity};

/// Stoplists applied to recognizer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Disease spans dropped when their lowercase text equals one of these.
    pub excluded_diseases: Vec<String>,
    /// Unit, dosage-form and packaging words. A chemical span made only of
    /// these words is dropped.
    pub medication_stoplist: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            excluded_diseases: vec!["doenças prévias".to_string()],
            medication_stoplist: [
                "mg",
                "ml",
                "actuat",
                "oral",
                "tablet",
                "solution",
                "preservative",
                "free",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntityFilter {
    excluded_diseases: HashSet<String>,
    medication_stoplist: HashSet<String>,
}

impl Default for EntityFilter {
    fn default() -> Self {
        Self::new(&FilterSettings::default())
    }
}

impl EntityFilter {
    pub fn new(settings: &FilterSettings) -> Self {
        Self {
            excluded_diseases: settings
                .excluded_diseases
                .iter()
                .map(|phrase| phrase.to_lowercase())
                .collect(),
            medication_stoplist: settings
                .medication_stoplist
                .iter()
                .map(|word| word.to_lowercase())
                .collect(),
        }
    }

    /// Split recognizer output into disease and medication lists.
    ///
    /// Categories other than disease and chemical are ignored.
    pub fn apply(&self, entities: &[RecognizedEntity]) -> FilteredEntities {
        let mut diseases = Vec::new();
        let mut medications = Vec::new();

        for entity in entities {
            match entity.category {
                EntityCategory::Disease if self.keeps_disease(&entity.text) => {
                    diseases.push(entity.text.clone());
                }
                EntityCategory::Chemical if self.keeps_medication(&entity.text) => {
                    medications.push(entity.text.clone());
                }
                _ => {}
            }
        }

        FilteredEntities {
            diseases: dedupe_preserving_order(diseases),
            medications: dedupe_preserving_order(medications),
        }
    }

    pub fn keeps_disease(&self, text: &str) -> bool {
        !self.excluded_diseases.contains(&text.to_lowercase())
    }

    /// A medication is kept when at least one of its whitespace tokens is
    /// outside the stoplist.
    pub fn keeps_medication(&self, text: &str) -> bool {
        !text
            .split_whitespace()
            .all(|token| self.medication_stoplist.contains(&token.to_lowercase()))
    }
}

/// Remove repeated items by exact equality, keeping each first occurrence in
/// its original relative position.
pub fn dedupe_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            kept.push(item);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_header_mistag_is_dropped_and_duplicates_collapse() {
        let entities = vec![
            RecognizedEntity::disease("Doenças Prévias"),
            RecognizedEntity::disease("Diabetes"),
            RecognizedEntity::disease("Diabetes"),
        ];
        let filtered = EntityFilter::default().apply(&entities);
        assert_eq!(filtered.diseases, vec!["Diabetes"]);
        assert!(filtered.medications.is_empty());
    }

    #[test]
    fn excluded_phrase_must_match_exactly() {
        let filter = EntityFilter::default();
        assert!(!filter.keeps_disease("DOENÇAS PRÉVIAS"));
        assert!(filter.keeps_disease("Doenças prévias:"));
        assert!(filter.keeps_disease("doenças prévias graves"));
    }

    #[test]
    fn dose_with_number_is_kept() {
        let filter = EntityFilter::default();
        assert!(filter.keeps_medication("500 mg"));
        assert!(filter.keeps_medication("Acetaminophen 325 MG Oral Tablet"));
    }

    #[test]
    fn all_stoplist_tokens_are_dropped() {
        let filter = EntityFilter::default();
        assert!(!filter.keeps_medication("oral tablet"));
        assert!(!filter.keeps_medication("Preservative Free"));
        assert!(!filter.keeps_medication("MG"));
        assert!(!filter.keeps_medication("   "));
    }

    #[test]
    fn other_categories_are_ignored() {
        let entities = vec![
            RecognizedEntity::new("BRCA1", EntityCategory::Other("GENE".to_string())),
            RecognizedEntity::chemical("Insulin"),
        ];
        let filtered = EntityFilter::default().apply(&entities);
        assert!(filtered.diseases.is_empty());
        assert_eq!(filtered.medications, vec!["Insulin"]);
    }

    #[test]
    fn dedupe_is_case_sensitive_and_keeps_first_position() {
        let items = ["Asthma", "asthma", "Gout", "Asthma", "Gout"]
            .into_iter()
            .map(str::to_string);
        assert_eq!(
            dedupe_preserving_order(items),
            vec!["Asthma", "asthma", "Gout"]
        );
    }

    #[test]
    fn custom_stoplist_replaces_default() {
        let filter = EntityFilter::new(&FilterSettings {
            excluded_diseases: vec![],
            medication_stoplist: vec!["comprimido".to_string()],
        });
        assert!(!filter.keeps_medication("Comprimido"));
        assert!(filter.keeps_medication("oral tablet"));
        assert!(filter.keeps_disease("Doenças Prévias"));
    }
}
