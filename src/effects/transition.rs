//! Named transitions with effectful actions.

use crate::core::StateName;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use thiserror::Error;

/// Failure signaled by a transition's action.
///
/// The engine does not interpret it; it is surfaced unchanged inside
/// [`FsmError::ActionFailed`](crate::FsmError::ActionFailed).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it reachable through `source()`.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Type alias for transition action functions.
///
/// Given the current data and the caller's payload, the function creates a
/// fresh effect that computes the raw data of the destination state.
pub type TransitionAction<Env> =
    Arc<dyn Fn(Value, Value) -> BoxedEffect<Value, ActionError, Env> + Send + Sync>;

/// A named move from one state to another.
///
/// Names are only unique per source state: lookup matches on `(from, name)`.
pub struct Transition<Env> {
    pub name: String,
    pub from: StateName,
    pub to: StateName,
    pub action: TransitionAction<Env>,
}

impl<Env> Transition<Env> {
    /// Check if this transition is the one called `name` from `state` (pure)
    pub fn matches(&self, state: &str, name: &str) -> bool {
        self.from == state && self.name == name
    }
}

impl<Env> Clone for Transition<Env> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<Env> fmt::Debug for Transition<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use stillwater::prelude::*;

    fn publish() -> Transition<()> {
        Transition {
            name: "publish".to_string(),
            from: StateName::from("Draft"),
            to: StateName::from("Published"),
            action: Arc::new(|data: Value, _payload: Value| pure(data).boxed()),
        }
    }

    #[test]
    fn matches_on_source_and_name() {
        let transition = publish();

        assert!(transition.matches("Draft", "publish"));
        assert!(!transition.matches("Published", "publish"));
        assert!(!transition.matches("Draft", "archive"));
    }

    #[test]
    fn clone_shares_action() {
        let transition = publish();
        let cloned = transition.clone();

        assert!(Arc::ptr_eq(&transition.action, &cloned.action));
        assert_eq!(cloned.name, "publish");
    }

    #[test]
    fn debug_omits_action() {
        let rendered = format!("{:?}", publish());
        assert!(rendered.contains("publish"));
        assert!(rendered.contains("Published"));
    }

    #[test]
    fn action_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "gateway timed out");
        let err = ActionError::with_source("payment declined", io);

        assert_eq!(err.to_string(), "payment declined");
        assert_eq!(err.source().unwrap().to_string(), "gateway timed out");
        assert!(ActionError::new("plain").source().is_none());
    }
}
