//! Pipeline configuration.
//!
//! Every knob has a default matching the reference prontuário layout, so an
//! empty TOML file (or no file at all) yields a working configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use prontuario_extract::{FieldSettings, FilterSettings};
use prontuario_model::TableKind;

use crate::error::ConfigError;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "PRONTUARIO_CONFIG";

/// Which recognizer backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    #[default]
    Lexicon,
    Onnx,
}

impl RecognizerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lexicon => "lexicon",
            Self::Onnx => "onnx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerSettings {
    pub kind: RecognizerKind,
    /// Lexicon CSV (`term,category`). The built-in lexicon is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<PathBuf>,
    /// Directory holding `model.onnx`, `tokenizer.json` and `config.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,
    /// Upper bound on the characters sent to the model per inference call.
    pub max_chunk_chars: usize,
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            kind: RecognizerKind::Lexicon,
            lexicon: None,
            model_dir: None,
            max_chunk_chars: 1000,
        }
    }
}

/// Output file names, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub patients: String,
    pub conditions: String,
    pub treatments: String,
    pub procedures_vaccines: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            patients: TableKind::Patients.default_file_name().to_string(),
            conditions: TableKind::Conditions.default_file_name().to_string(),
            treatments: TableKind::Treatments.default_file_name().to_string(),
            procedures_vaccines: TableKind::ProceduresVaccines
                .default_file_name()
                .to_string(),
        }
    }
}

impl OutputSettings {
    pub fn file_name(&self, kind: TableKind) -> &str {
        match kind {
            TableKind::Patients => &self.patients,
            TableKind::Conditions => &self.conditions,
            TableKind::Treatments => &self.treatments,
            TableKind::ProceduresVaccines => &self.procedures_vaccines,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub filter: FilterSettings,
    pub fields: FieldSettings,
    pub recognizer: RecognizerSettings,
    pub output: OutputSettings,
}

impl PipelineConfig {
    /// Load a config file. Missing sections fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Parse TOML content; `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Resolve the effective config: explicit path, then `PRONTUARIO_CONFIG`,
    /// then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(value) if !value.is_empty() => Self::load(Path::new(&value)),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = PipelineConfig::from_toml_str("", Path::new("empty.toml")).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.recognizer.kind, RecognizerKind::Lexicon);
        assert_eq!(config.output.file_name(TableKind::Treatments), "tratamentos.csv");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml = r#"
[filter]
excluded_diseases = ["doenças prévias", "nenhuma"]

[recognizer]
kind = "onnx"
model_dir = "models/bc5cdr"
"#;
        let config = PipelineConfig::from_toml_str(toml, Path::new("p.toml")).unwrap();
        assert_eq!(config.filter.excluded_diseases.len(), 2);
        assert_eq!(config.filter.medication_stoplist.len(), 8);
        assert_eq!(config.recognizer.kind, RecognizerKind::Onnx);
        assert_eq!(
            config.recognizer.model_dir.as_deref(),
            Some(Path::new("models/bc5cdr"))
        );
        assert_eq!(config.recognizer.max_chunk_chars, 1000);
        assert_eq!(config.fields.name_terminator, "Id");
    }

    #[test]
    fn unknown_recognizer_kind_is_a_toml_error() {
        let err = PipelineConfig::from_toml_str("[recognizer]\nkind = \"spacy\"\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = PipelineConfig::default();
        config.output.patients = "patients.csv".to_string();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[recognizer]"));
        let parsed = PipelineConfig::from_toml_str(&text, Path::new("roundtrip.toml")).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prontuario.toml");
        std::fs::write(&path, "[fields]\nlist_delimiter = \"; \"\n").unwrap();
        let config = PipelineConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.fields.list_delimiter, "; ");
    }
}
