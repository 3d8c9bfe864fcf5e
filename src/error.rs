//! Engine errors

use thiserror::Error;

use crate::simulation::session::SessionState;

/// Engine result type
pub type Result<T> = std::result::Result<T, LabError>;

/// Errors surfaced by the lab engine
///
/// `NotFound` and `AlreadyExists` indicate a setup/update mismatch inside an
/// experiment module and are never retried. `InvalidParameter` is the structured
/// failure for bad numeric input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabError {
    #[error("unknown experiment kind: {0}")]
    UnknownKind(String),

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("entity already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("cannot {operation} a session in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}

impl LabError {
    /// Shorthand for an [`LabError::InvalidParameter`]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
