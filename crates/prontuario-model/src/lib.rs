//! Domain types for prontuário extraction.
//!
//! The per-document types ([`DemographicRecord`], [`RecognizedEntity`],
//! [`FilteredEntities`], [`DocumentExtraction`]) live only while one document
//! is processed. [`PatientTables`] is the batch-wide accumulator that turns
//! them into rows.

pub mod document;
pub mod entity;
pub mod error;
pub mod patient;
pub mod table;

pub use document::DocumentExtraction;
pub use entity::{EntityCategory, FilteredEntities, RecognizedEntity};
pub use error::{ModelError, Result};
pub use patient::{DemographicRecord, Sex};
pub use table::{
    ConditionRow, PatientRow, PatientTables, ProcedureVaccineRow, TableKind, TreatmentRow,
};
