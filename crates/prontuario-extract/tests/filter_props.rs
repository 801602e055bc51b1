//! Property tests for entity filtering.

use std::collections::HashSet;

use proptest::prelude::*;

use prontuario_extract::{EntityFilter, dedupe_preserving_order};
use prontuario_model::{EntityCategory, RecognizedEntity};

fn entity_strategy() -> impl Strategy<Value = RecognizedEntity> {
    let text = prop::sample::select(vec![
        "Diabetes",
        "Asthma",
        "asthma",
        "Doenças Prévias",
        "Insulin",
        "500 mg",
        "oral tablet",
        "Metformin",
    ]);
    let category = prop::sample::select(vec![
        EntityCategory::Disease,
        EntityCategory::Chemical,
        EntityCategory::Other("GENE".to_string()),
    ]);
    (text, category).prop_map(|(text, category)| RecognizedEntity::new(text, category))
}

/// Position of the first occurrence of each distinct value.
fn first_positions(values: &[String]) -> Vec<&String> {
    let mut seen = HashSet::new();
    values.iter().filter(|value| seen.insert(*value)).collect()
}

proptest! {
    #[test]
    fn dedupe_output_has_no_duplicates(items in prop::collection::vec("[a-c]{1,2}", 0..30)) {
        let deduped = dedupe_preserving_order(items.clone());
        let unique: HashSet<&String> = deduped.iter().collect();
        prop_assert_eq!(unique.len(), deduped.len());
        let expected: Vec<String> = first_positions(&items).into_iter().cloned().collect();
        prop_assert_eq!(deduped, expected);
    }

    #[test]
    fn filtered_lists_are_unique_and_ordered(entities in prop::collection::vec(entity_strategy(), 0..40)) {
        let filtered = EntityFilter::default().apply(&entities);

        let diseases: HashSet<&String> = filtered.diseases.iter().collect();
        prop_assert_eq!(diseases.len(), filtered.diseases.len());
        let medications: HashSet<&String> = filtered.medications.iter().collect();
        prop_assert_eq!(medications.len(), filtered.medications.len());

        let disease_order: Vec<String> = entities
            .iter()
            .filter(|e| e.category == EntityCategory::Disease && e.text != "Doenças Prévias")
            .map(|e| e.text.clone())
            .collect();
        let expected: Vec<String> = first_positions(&disease_order).into_iter().cloned().collect();
        prop_assert_eq!(&filtered.diseases, &expected);

        prop_assert!(!filtered.medications.iter().any(|m| m == "oral tablet"));
    }
}
