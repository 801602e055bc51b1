use serde::{Deserialize, Serialize};

use crate::entity::FilteredEntities;
use crate::patient::DemographicRecord;

/// Everything extracted from one successfully processed prontuário.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentExtraction {
    pub demographics: DemographicRecord,
    pub entities: FilteredEntities,
    pub procedures: Vec<String>,
    pub vaccines: Vec<String>,
}

impl DocumentExtraction {
    pub fn patient_name(&self) -> &str {
        self.demographics.name()
    }
}
