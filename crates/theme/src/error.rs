use std::io;

use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid theme: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
}

impl ThemeError {
    /// Validation failures, if this is a validation error.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            ThemeError::Validation(errors) => errors,
            ThemeError::UnknownTheme(_) => &[],
        }
    }
}

impl From<Vec<ValidationError>> for ThemeError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ThemeError::Validation(errors)
    }
}

impl From<ValidationError> for ThemeError {
    fn from(error: ValidationError) -> Self {
        ThemeError::Validation(vec![error])
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode state: {0}")]
    Encode(String),
    #[error("failed to decode state: {0}")]
    Decode(String),
}
