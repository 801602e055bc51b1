//! Recognizer construction from configuration.

use tracing::info;

use prontuario_extract::{EntityRecognizer, LexiconRecognizer, RecognizerError};

use crate::config::{RecognizerKind, RecognizerSettings};

/// Build the configured recognizer.
///
/// The ONNX backend is only available when the crate is built with the
/// `onnx-ner` feature; otherwise selecting it reports
/// [`RecognizerError::Unavailable`].
pub fn build_recognizer(
    settings: &RecognizerSettings,
) -> Result<Box<dyn EntityRecognizer>, RecognizerError> {
    match settings.kind {
        RecognizerKind::Lexicon => {
            let lexicon = match &settings.lexicon {
                Some(path) => LexiconRecognizer::from_path(path)?,
                None => LexiconRecognizer::builtin()?,
            };
            info!(
                recognizer = "lexicon",
                source = lexicon.source_name(),
                terms = lexicon.term_count(),
                "recognizer ready"
            );
            Ok(Box::new(lexicon))
        }
        RecognizerKind::Onnx => build_onnx(settings),
    }
}

#[cfg(feature = "onnx-ner")]
fn build_onnx(
    settings: &RecognizerSettings,
) -> Result<Box<dyn EntityRecognizer>, RecognizerError> {
    use std::path::PathBuf;

    let model_dir = settings
        .model_dir
        .clone()
        .ok_or_else(|| RecognizerError::ModelNotFound {
            path: PathBuf::from("<recognizer.model_dir unset>"),
        })?;
    let recognizer =
        prontuario_extract::OnnxRecognizer::load(&model_dir, settings.max_chunk_chars)?;
    info!(
        recognizer = "onnx",
        model_dir = %model_dir.display(),
        "recognizer ready"
    );
    Ok(Box::new(recognizer))
}

#[cfg(not(feature = "onnx-ner"))]
fn build_onnx(
    _settings: &RecognizerSettings,
) -> Result<Box<dyn EntityRecognizer>, RecognizerError> {
    Err(RecognizerError::Unavailable {
        kind: "onnx",
        feature: "onnx-ner",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_build_builtin_lexicon() {
        let recognizer = build_recognizer(&RecognizerSettings::default()).unwrap();
        assert_eq!(recognizer.name(), "lexicon");
        let entities = recognizer.recognize("History of Hypertension").unwrap();
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn missing_lexicon_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RecognizerSettings {
            lexicon: Some(dir.path().join("missing.csv")),
            ..RecognizerSettings::default()
        };
        assert!(build_recognizer(&settings).is_err());
    }

    #[cfg(not(feature = "onnx-ner"))]
    #[test]
    fn onnx_without_feature_is_unavailable() {
        let settings = RecognizerSettings {
            kind: RecognizerKind::Onnx,
            ..RecognizerSettings::default()
        };
        let err = build_recognizer(&settings).err().unwrap();
        assert!(matches!(
            err,
            RecognizerError::Unavailable {
                kind: "onnx",
                feature: "onnx-ner"
            }
        ));
    }
}
