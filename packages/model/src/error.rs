use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Malformed document or patch shape. Raised before anything is mutated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Configuration must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Missing required field `{field}` at {path}")]
    MissingField { path: String, field: &'static str },

    #[error("Field `{field}` at {path} must be {expected}")]
    WrongType {
        path: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Duplicate {scope} id '{id}'")]
    DuplicateId { scope: &'static str, id: String },

    #[error("Invalid page config for '{id}': {message}")]
    InvalidPageConfig { id: String, message: String },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

impl ValidationError {
    pub fn missing(path: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            path: path.into(),
            field,
        }
    }

    pub fn wrong_type(path: impl Into<String>, field: &'static str, expected: &'static str) -> Self {
        Self::WrongType {
            path: path.into(),
            field,
            expected,
        }
    }

    pub fn duplicate(scope: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            scope,
            id: id.into(),
        }
    }
}
