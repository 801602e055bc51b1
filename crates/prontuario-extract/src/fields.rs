//! Labeled-field parsing.
//!
//! Every rule is a first-match rule applied once to the full document text:
//! labels are case-sensitive and only the first occurrence of a label is
//! honored. `Procedimentos:` is line-bounded, `Vacinas:` runs to the end of
//! the text because it is the last section of the layout.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use prontuario_model::{DemographicRecord, Sex};

use crate::error::{Field, FieldError};

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Nome:\s*([^\n]+)").expect("Invalid name regex"));

static SEX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Sexo:\s*(\S*)").expect("Invalid sex regex"));

static BIRTH_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Data de Nascimento:\s*([0-9-]+)").expect("Invalid birth date regex")
});

static PROCEDURES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Procedimentos:\s*(.+?)\n").expect("Invalid procedures regex"));

static VACCINES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Vacinas:\s*(.+)").expect("Invalid vaccines regex"));

/// Layout-dependent knobs of the field rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Separator between items of the procedure and vaccine lists.
    pub list_delimiter: String,
    /// The name is cut at the first occurrence of this marker. The renderer
    /// prints the patient identifier right after the name with no separator.
    pub name_terminator: String,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            list_delimiter: ", ".to_string(),
            name_terminator: "Id".to_string(),
        }
    }
}

/// Fields recovered from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFields {
    pub demographics: DemographicRecord,
    pub procedures: Vec<String>,
    pub vaccines: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FieldParser {
    settings: FieldSettings,
}

impl FieldParser {
    pub fn new(settings: FieldSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    /// Parse the required demographics and the optional list sections.
    pub fn parse(&self, text: &str) -> Result<ParsedFields, FieldError> {
        Ok(ParsedFields {
            demographics: self.parse_demographics(text)?,
            procedures: self.parse_procedures(text),
            vaccines: self.parse_vaccines(text),
        })
    }

    pub fn parse_demographics(&self, text: &str) -> Result<DemographicRecord, FieldError> {
        let name = self.parse_name(text)?;
        let sex = parse_sex(text)?;
        let birth_date = parse_birth_date(text)?;
        DemographicRecord::new(name.clone(), sex, birth_date).map_err(|_| FieldError::Malformed {
            field: Field::Name,
            value: name,
        })
    }

    pub fn parse_name(&self, text: &str) -> Result<String, FieldError> {
        let Some(caps) = NAME_REGEX.captures(text) else {
            return Err(missing_or_malformed(text, Field::Name));
        };
        let line = &caps[1];
        let name = match line.find(self.settings.name_terminator.as_str()) {
            Some(idx) if !self.settings.name_terminator.is_empty() => &line[..idx],
            _ => line,
        }
        .trim();
        if name.is_empty() {
            return Err(FieldError::Malformed {
                field: Field::Name,
                value: line.to_string(),
            });
        }
        Ok(name.to_string())
    }

    /// Items of the `Procedimentos:` line; empty when the section is absent.
    pub fn parse_procedures(&self, text: &str) -> Vec<String> {
        PROCEDURES_REGEX
            .captures(text)
            .map(|caps| self.split_list(&caps[1]))
            .unwrap_or_default()
    }

    /// Items after `Vacinas:` up to the end of the text; empty when absent.
    pub fn parse_vaccines(&self, text: &str) -> Vec<String> {
        VACCINES_REGEX
            .captures(text)
            .map(|caps| self.split_list(caps[1].trim_end()))
            .unwrap_or_default()
    }

    fn split_list(&self, section: &str) -> Vec<String> {
        if section.is_empty() {
            return Vec::new();
        }
        section
            .split(self.settings.list_delimiter.as_str())
            .map(str::to_string)
            .collect()
    }
}

fn parse_sex(text: &str) -> Result<Sex, FieldError> {
    let Some(caps) = SEX_REGEX.captures(text) else {
        return Err(FieldError::Missing { field: Field::Sex });
    };
    let code = &caps[1];
    code.parse::<Sex>().map_err(|_| FieldError::Malformed {
        field: Field::Sex,
        value: code.to_string(),
    })
}

fn parse_birth_date(text: &str) -> Result<String, FieldError> {
    match BIRTH_DATE_REGEX.captures(text) {
        Some(caps) => Ok(caps[1].to_string()),
        None => Err(missing_or_malformed(text, Field::BirthDate)),
    }
}

/// Distinguish an absent label from a label whose value did not match.
fn missing_or_malformed(text: &str, field: Field) -> FieldError {
    match text.find(field.label()) {
        Some(idx) => {
            let rest = &text[idx + field.label().len()..];
            let value = rest.trim_start().lines().next().unwrap_or("").trim();
            FieldError::Malformed {
                field,
                value: value.to_string(),
            }
        }
        None => FieldError::Missing { field },
    }
}
