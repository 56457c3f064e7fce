//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent rejected input to the tree engine.
/// Structural invariant breaks are bugs and are not reported through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot deserialize field {field}: {reason}")]
    Deserialization { field: String, reason: String },
}

impl DomainError {
    pub(crate) fn deserialization(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Deserialization {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Path of the offending field, e.g. `$.left.color`.
    pub fn field(&self) -> &str {
        match self {
            Self::Deserialization { field, .. } => field,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
