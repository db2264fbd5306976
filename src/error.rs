//! Custom error types for EstimateCLI
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::AllocationLevel;

/// The main error type for EstimateCLI operations
#[derive(Error, Debug)]
pub enum EstimateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Allocation targeting errors
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EstimateError {
    /// Create a "not found" error for estimates
    pub fn estimate_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Estimate",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Allocation(AllocationError::NotFound { .. })
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for EstimateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EstimateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for EstimateCLI operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Conditions raised while resolving or validating an allocation target
///
/// None of these are fatal. The first three are expected states of an
/// interactive selection; the rest reject a persisted target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The id required for the requested level has not been chosen yet
    #[error("No {level} selected")]
    IncompleteSelection { level: AllocationLevel },

    /// No node with this id exists in the estimate
    #[error("No estimate node with id '{target_id}'")]
    NotFound { target_id: String },

    /// The estimate has no groups at all
    #[error("Estimate '{estimate_id}' has no budget structure")]
    EmptyStructure { estimate_id: String },

    /// The target refers to a different estimate
    #[error("Target belongs to estimate '{found}', expected '{expected}'")]
    EstimateMismatch { expected: String, found: String },

    /// The target id exists but at a different level
    #[error("Target is a {found}, expected a {expected}")]
    LevelMismatch {
        expected: AllocationLevel,
        found: AllocationLevel,
    },

    /// A node-level target without a node id
    #[error("A {level} target requires a target id")]
    MissingTarget { level: AllocationLevel },

    /// An estimate-level target that carries a node id
    #[error("An estimate-level target must not carry a target id")]
    UnexpectedTarget,
}

impl AllocationError {
    /// Whether this is an expected selection state rather than a bad target
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::IncompleteSelection { .. } | Self::NotFound { .. } | Self::EmptyStructure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EstimateError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = EstimateError::estimate_not_found("est-42");
        assert_eq!(err.to_string(), "Estimate not found: est-42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_allocation_not_found_is_not_found() {
        let err: EstimateError = AllocationError::NotFound {
            target_id: "ss-9".into(),
        }
        .into();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Allocation error: No estimate node with id 'ss-9'"
        );
    }

    #[test]
    fn test_recoverable_taxonomy() {
        assert!(AllocationError::IncompleteSelection {
            level: AllocationLevel::Section
        }
        .is_recoverable());
        assert!(AllocationError::EmptyStructure {
            estimate_id: "e".into()
        }
        .is_recoverable());
        assert!(!AllocationError::UnexpectedTarget.is_recoverable());
        assert!(!AllocationError::EstimateMismatch {
            expected: "a".into(),
            found: "b".into()
        }
        .is_recoverable());
    }

    #[test]
    fn test_incomplete_selection_display() {
        let err = AllocationError::IncompleteSelection {
            level: AllocationLevel::Subsection,
        };
        assert_eq!(err.to_string(), "No subsection selected");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EstimateError = io_err.into();
        assert!(matches!(err, EstimateError::Io(_)));
    }
}
