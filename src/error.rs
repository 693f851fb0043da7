use std::fmt;
use thiserror::Error;

/// A single rejected input field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid input:\n{}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("category {id} is still used by {transactions} transaction(s)")]
    CategoryInUse { id: i64, transactions: i64 },

    #[error("line {line}: {message}")]
    Import { line: usize, message: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("terminal error: {0}")]
    Terminal(String),
}

impl TrackerError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        TrackerError::NotFound { entity, id }
    }

    /// Errors the user can fix by changing their input. Anything else is unexpected.
    pub fn is_user_error(&self) -> bool {
        match self {
            TrackerError::Validation(_)
            | TrackerError::NotFound { .. }
            | TrackerError::CategoryInUse { .. }
            | TrackerError::Import { .. } => true,
            TrackerError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, TrackerError>;
