//! Errors surfaced by parsing and executing.

use crate::core::StateName;
use crate::effects::transition::ActionError;
use crate::schema::ValidationError;
use thiserror::Error;

/// Errors from [`Definition::parse`](crate::Definition::parse),
/// [`Definition::parse_state`](crate::Definition::parse_state) and
/// [`Instance::execute`](crate::Instance::execute).
///
/// None of them leave a partial effect behind: the instance an `execute`
/// failed on is exactly as it was before the call.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("unknown state '{state}'")]
    UnknownState { state: String },

    #[error("input does not declare its state: expected a string '{field}' field")]
    UntaggedInput { field: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown transition '{transition}' from state '{state}'")]
    UnknownTransition {
        transition: String,
        state: StateName,
    },

    #[error("transition '{transition}' from state '{state}' failed")]
    ActionFailed {
        transition: String,
        state: StateName,
        #[source]
        source: ActionError,
    },
}

impl FsmError {
    /// Returns a stable code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            FsmError::UnknownState { .. } => "UNKNOWN_STATE",
            FsmError::UntaggedInput { .. } => "UNTAGGED_INPUT",
            FsmError::Validation(_) => "VALIDATION_FAILED",
            FsmError::UnknownTransition { .. } => "UNKNOWN_TRANSITION",
            FsmError::ActionFailed { .. } => "ACTION_FAILED",
        }
    }

    /// The validation details, if this is a validation failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            FsmError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
