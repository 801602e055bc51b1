use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Sex code as printed on the prontuário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Sex {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "M" => Ok(Self::Male),
            "F" => Ok(Self::Female),
            other => Err(ModelError::InvalidSex(other.to_string())),
        }
    }
}

/// Demographic fields recovered from the labeled header of a prontuário.
///
/// Constructed through [`DemographicRecord::new`], which rejects an empty
/// name. `birth_date` is kept verbatim (digits and hyphens as printed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicRecord {
    name: String,
    sex: Sex,
    birth_date: String,
}

impl DemographicRecord {
    pub fn new(name: impl Into<String>, sex: Sex, birth_date: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(Self {
            name,
            sex,
            birth_date: birth_date.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_parses_single_letter_codes() {
        assert_eq!("M".parse::<Sex>(), Ok(Sex::Male));
        assert_eq!("F".parse::<Sex>(), Ok(Sex::Female));
    }

    #[test]
    fn sex_rejects_anything_else() {
        assert_eq!(
            "f".parse::<Sex>(),
            Err(ModelError::InvalidSex("f".to_string()))
        );
        assert!("Female".parse::<Sex>().is_err());
        assert!("".parse::<Sex>().is_err());
    }

    #[test]
    fn record_rejects_blank_name() {
        let err = DemographicRecord::new("   ", Sex::Female, "1990-05-12").unwrap_err();
        assert_eq!(err, ModelError::EmptyName);
    }

    #[test]
    fn sex_serializes_as_code() {
        let json = serde_json::to_string(&Sex::Female).unwrap();
        assert_eq!(json, "\"F\"");
    }
}
