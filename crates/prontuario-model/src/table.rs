//! Output tables and the batch-wide accumulator.
//!
//! Rows are keyed by the extracted patient name; no synthetic patient
//! identifier exists at this stage, and a name seen in two documents yields
//! two independent patient rows.

use serde::{Deserialize, Serialize};

use crate::document::DocumentExtraction;

/// The four tables produced by a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    Patients,
    Conditions,
    Treatments,
    ProceduresVaccines,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Patients,
        TableKind::Conditions,
        TableKind::Treatments,
        TableKind::ProceduresVaccines,
    ];

    /// Column headers, in output order.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Patients => &["Name", "Sex", "DataDeNascimento"],
            Self::Conditions => &["NomeDoPaciente", "CondicaoMedica"],
            Self::Treatments => &["NomeDoPaciente", "Medicamento"],
            Self::ProceduresVaccines => &["NomeDoPaciente", "ProcedimentoVacina"],
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Patients => "pacientes.csv",
            Self::Conditions => "condicoes.csv",
            Self::Treatments => "tratamentos.csv",
            Self::ProceduresVaccines => "procedimentos_vacinas.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Patients => "Pacientes",
            Self::Conditions => "Condições",
            Self::Treatments => "Tratamentos",
            Self::ProceduresVaccines => "Procedimentos/Vacinas",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRow {
    pub name: String,
    pub sex: String,
    pub birth_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRow {
    pub patient_name: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentRow {
    pub patient_name: String,
    pub medication: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureVaccineRow {
    pub patient_name: String,
    pub item: String,
}

/// Append-only accumulator for the four output tables.
///
/// Created empty before the batch loop; each successfully processed
/// document is folded in with [`PatientTables::append`] in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientTables {
    pub patients: Vec<PatientRow>,
    pub conditions: Vec<ConditionRow>,
    pub treatments: Vec<TreatmentRow>,
    pub procedures_vaccines: Vec<ProcedureVaccineRow>,
}

impl PatientTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document into the tables.
    ///
    /// Appends one patient row, one row per disease, one per medication, and
    /// one per procedure followed by one per vaccine.
    pub fn append(&mut self, document: &DocumentExtraction) {
        let name = document.patient_name();
        let demographics = &document.demographics;

        self.patients.push(PatientRow {
            name: name.to_string(),
            sex: demographics.sex().code().to_string(),
            birth_date: demographics.birth_date().to_string(),
        });

        self.conditions
            .extend(document.entities.diseases.iter().map(|disease| ConditionRow {
                patient_name: name.to_string(),
                condition: disease.clone(),
            }));

        self.treatments.extend(
            document
                .entities
                .medications
                .iter()
                .map(|medication| TreatmentRow {
                    patient_name: name.to_string(),
                    medication: medication.clone(),
                }),
        );

        self.procedures_vaccines.extend(
            document
                .procedures
                .iter()
                .chain(document.vaccines.iter())
                .map(|item| ProcedureVaccineRow {
                    patient_name: name.to_string(),
                    item: item.clone(),
                }),
        );
    }

    pub fn row_count(&self, kind: TableKind) -> usize {
        match kind {
            TableKind::Patients => self.patients.len(),
            TableKind::Conditions => self.conditions.len(),
            TableKind::Treatments => self.treatments.len(),
            TableKind::ProceduresVaccines => self.procedures_vaccines.len(),
        }
    }

    /// Row values of one table, in column order matching [`TableKind::headers`].
    pub fn records(&self, kind: TableKind) -> Vec<Vec<&str>> {
        match kind {
            TableKind::Patients => self
                .patients
                .iter()
                .map(|row| vec![row.name.as_str(), row.sex.as_str(), row.birth_date.as_str()])
                .collect(),
            TableKind::Conditions => self
                .conditions
                .iter()
                .map(|row| vec![row.patient_name.as_str(), row.condition.as_str()])
                .collect(),
            TableKind::Treatments => self
                .treatments
                .iter()
                .map(|row| vec![row.patient_name.as_str(), row.medication.as_str()])
                .collect(),
            TableKind::ProceduresVaccines => self
                .procedures_vaccines
                .iter()
                .map(|row| vec![row.patient_name.as_str(), row.item.as_str()])
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        TableKind::ALL.iter().all(|kind| self.row_count(*kind) == 0)
    }
}
