//! Build errors for definitions and transitions.

use thiserror::Error;

/// Errors that can occur when growing a definition or building a transition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Transition name is empty. Pass a name to TransitionBuilder::new")]
    MissingName,

    #[error("Transition '{transition}' has no source state. Call .from(state)")]
    MissingFromState { transition: String },

    #[error("Transition '{transition}' has no target state. Call .to(state)")]
    MissingToState { transition: String },

    #[error("Transition '{transition}' has no action. Call .action(effect) or .action_fn(f)")]
    MissingAction { transition: String },

    #[error("State '{state}' is already registered")]
    DuplicateState { state: String },

    #[error("Transition '{transition}' starts from unregistered state '{state}'")]
    UnknownSourceState { transition: String, state: String },

    #[error("Transition '{transition}' targets unregistered state '{state}'")]
    UnknownTargetState { transition: String, state: String },
}
