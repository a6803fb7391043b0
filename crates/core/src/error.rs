//! Domain error model.

use thiserror::Error;

use crate::entity::EntityKind;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is local and recoverable: a rejected operation leaves the
/// store exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No record matches the given identifier.
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// A state machine rejected the requested move.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A conflict occurred (e.g. duplicate identifier).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(entity: EntityKind, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_transition(from: impl core::fmt::Display, to: impl core::fmt::Display) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = DomainError::not_found(EntityKind::Robot, "R9");
        assert_eq!(err.to_string(), "robot not found: R9");
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_transition_message() {
        let err = DomainError::invalid_transition("completed", "pending");
        assert_eq!(err.to_string(), "invalid transition from completed to pending");
        assert!(!err.is_not_found());
    }
}
