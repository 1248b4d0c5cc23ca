use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParityDeskError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing input: {field} is empty or not a number")]
    MissingInput { field: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Incomplete selection: {0}")]
    IncompleteSelection(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ParityDeskError {
    pub(crate) fn missing(field: &str) -> Self {
        ParityDeskError::MissingInput {
            field: field.to_string(),
        }
    }
}

impl From<serde_json::Error> for ParityDeskError {
    fn from(e: serde_json::Error) -> Self {
        ParityDeskError::SerializationError(e.to_string())
    }
}
