//! Prontuário extraction pipeline.
//!
//! Ties the ingest, field and recognizer crates together:
//!
//! - [`PipelineConfig`]: TOML configuration with defaults for every knob
//! - [`build_recognizer`]: constructs the configured recognizer backend
//! - [`Pipeline`]: per-document processing and batch aggregation into
//!   [`prontuario_model::PatientTables`]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod recognizer;
pub mod redact;

pub use config::{
    CONFIG_ENV_VAR, OutputSettings, PipelineConfig, RecognizerKind, RecognizerSettings,
};
pub use error::{BatchError, ConfigError, DocumentError};
pub use pipeline::{BatchOutcome, Pipeline, SkippedDocument};
pub use recognizer::build_recognizer;
