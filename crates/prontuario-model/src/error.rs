use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unrecognized sex code '{0}' (expected M or F)")]
    InvalidSex(String),
    #[error("patient name is empty")]
    EmptyName,
}

pub type Result<T> = std::result::Result<T, ModelError>;
