//! Error types for field parsing and entity recognition.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Required labeled fields of a prontuário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Sex,
    BirthDate,
}

impl Field {
    /// Label as printed on the document.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Nome:",
            Self::Sex => "Sexo:",
            Self::BirthDate => "Data de Nascimento:",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A required field is absent or unusable.
///
/// Both variants abort processing of the document they came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("required field '{field}' not found")]
    Missing { field: Field },

    #[error("required field '{field}' has unusable value '{value}'")]
    Malformed { field: Field, value: String },
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            Self::Missing { field } | Self::Malformed { field, .. } => *field,
        }
    }
}

/// Failures of the entity recognition capability.
///
/// These are environment problems rather than data problems; the batch stops
/// on the first one.
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// A model or lexicon file does not exist.
    #[error("recognizer resource not found: {path}")]
    ModelNotFound { path: PathBuf },

    /// The model could not be initialized.
    #[error("failed to initialize recognizer model: {message}")]
    ModelInit { message: String },

    /// The lexicon could not be read or is empty.
    #[error("invalid lexicon {source_name}: {message}")]
    Lexicon {
        source_name: String,
        message: String,
    },

    /// Inference failed on a given text.
    #[error("recognizer inference failed: {message}")]
    Inference { message: String },

    /// The recognizer returned a span the pipeline cannot use.
    #[error("recognizer '{recognizer}' returned a malformed span: {reason}")]
    MalformedSpan { recognizer: String, reason: String },

    /// The requested recognizer is not compiled into this build.
    #[error("recognizer '{kind}' is not available in this build (enable the '{feature}' feature)")]
    Unavailable {
        kind: &'static str,
        feature: &'static str,
    },
}
