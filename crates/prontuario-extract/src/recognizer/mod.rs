//! Entity recognition capability.
//!
//! The pipeline sees a recognizer only through [`EntityRecognizer`]; the
//! concrete model is built once at startup and passed by reference into
//! every document's processing.

mod lexicon;
#[cfg(feature = "onnx-ner")]
mod onnx;

pub use lexicon::LexiconRecognizer;
#[cfg(feature = "onnx-ner")]
pub use onnx::OnnxRecognizer;

use prontuario_model::RecognizedEntity;

use crate::error::RecognizerError;

/// A named-entity recognizer over free text.
///
/// Implementations return spans in the order they emit them (document order
/// for the bundled recognizers). Categories beyond disease and chemical are
/// allowed and ignored downstream.
pub trait EntityRecognizer {
    /// Short identifier used in logs and error reports.
    fn name(&self) -> &str;

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, RecognizerError>;
}

impl<R: EntityRecognizer + ?Sized> EntityRecognizer for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        (**self).recognize(text)
    }
}

/// Reject spans with no usable surface text.
pub fn validate_spans(
    recognizer: &str,
    entities: &[RecognizedEntity],
) -> Result<(), RecognizerError> {
    for (idx, entity) in entities.iter().enumerate() {
        if entity.text.trim().is_empty() {
            return Err(RecognizerError::MalformedSpan {
                recognizer: recognizer.to_string(),
                reason: format!("span {idx} ({}) has empty text", entity.category),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_spans_rejects_blank_text() {
        let entities = vec![
            RecognizedEntity::disease("Asthma"),
            RecognizedEntity::chemical(" "),
        ];
        let err = validate_spans("test", &entities).unwrap_err();
        assert!(matches!(err, RecognizerError::MalformedSpan { .. }));
        assert!(err.to_string().contains("span 1 (CHEMICAL)"));
    }

    #[test]
    fn validate_spans_accepts_empty_output() {
        assert!(validate_spans("test", &[]).is_ok());
    }
}
