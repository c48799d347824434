use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Duplicate field '{field}' declared in schema '{schema}'")]
    DuplicateField { schema: String, field: String },

    #[error("Default for field '{field}' in schema '{schema}' is not a valid {expected}")]
    InvalidDefault {
        schema: String,
        field: String,
        expected: String,
    },
}
