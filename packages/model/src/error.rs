//! Error types for loading and persisting projects
//!
//! Structural operations never fail with an error: they report failure through
//! `bool` or `Option`. Errors only arise at the edges, when records are read
//! from or written to durable storage.

use crate::integrity::IntegrityViolation;
use crate::serialization::ModelTag;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a {expected} record, found {found}")]
    UnexpectedModel { expected: ModelTag, found: ModelTag },

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Dangling reference from {from} to {to}")]
    DanglingReference { from: String, to: String },

    #[error("Project violates {} structural invariant(s), first: {}", .0.len(), first_violation(.0))]
    Integrity(Vec<IntegrityViolation>),

    #[error("Project is not file-backed")]
    NotFileBacked,
}

/// Result alias for fallible model I/O
pub type ModelResult<T> = Result<T, ModelError>;

fn first_violation(violations: &[IntegrityViolation]) -> String {
    violations
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ContentId, ElementId};

    #[test]
    fn test_empty_integrity_error_displays() {
        let message = ModelError::Integrity(Vec::new()).to_string();
        assert_eq!(message, "Project violates 0 structural invariant(s), first: none");
    }

    #[test]
    fn test_integrity_error_names_first_violation() {
        let error = ModelError::Integrity(vec![IntegrityViolation::MissingContainer {
            element: ElementId::from("e1"),
            container: ContentId::from("c1"),
        }]);
        assert_eq!(
            error.to_string(),
            "Project violates 1 structural invariant(s), first: element e1 references missing container c1"
        );
    }
}
