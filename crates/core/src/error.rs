//! Domain error model.

use thiserror::Error;

use crate::id::EntityId;

/// Result type used across the domain and store layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures raised by stores and by the
/// referential checks performed before a write. Decode failures and envelope
/// timeouts belong to the transport layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The identity is absent from the store (never created, or deleted).
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: EntityId },

    /// A referential precondition or an input check failed.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn not_found(kind: &'static str, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
