//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

use prontuario_extract::{Field, FieldError, RecognizerError};
use prontuario_ingest::IngestError;

/// Errors reading or writing the pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Why a single document produced no rows.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document could not be read or a page had no text.
    #[error(transparent)]
    Extraction(#[from] IngestError),

    /// A required labeled field is absent or malformed.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The recognizer failed. Fatal for the batch.
    #[error(transparent)]
    Recognizer(#[from] RecognizerError),
}

impl DocumentError {
    /// Recognizer failures stop the batch; everything else skips the document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Recognizer(_))
    }

    /// The required field at fault, for field errors.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Field(error) => Some(error.field()),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "extraction",
            Self::Field(_) => "field",
            Self::Recognizer(_) => "recognizer",
        }
    }
}

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("recognizer failed while processing {path}: {source}")]
    Recognizer {
        path: PathBuf,
        #[source]
        source: RecognizerError,
    },

    #[error(transparent)]
    Discovery(#[from] IngestError),
}
