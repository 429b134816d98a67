//! Guard predicates over state data.
//!
//! Guards are pure boolean functions attached to a shape. They express rules
//! that span several fields ("`end` must not precede `start`") and run after
//! the structural checks have passed.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Pure, named predicate over a state's data.
///
/// # Example
///
/// ```rust
/// use waypoint::core::Guard;
/// use serde_json::json;
///
/// let has_title = Guard::new("title must not be empty", |data| {
///     data["title"].as_str().is_some_and(|t| !t.is_empty())
/// });
///
/// assert!(has_title.check(&json!({"title": "Hi"})));
/// assert!(!has_title.check(&json!({"title": ""})));
/// assert_eq!(has_title.message(), "title must not be empty");
/// ```
#[derive(Clone)]
pub struct Guard {
    message: String,
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a message and a pure predicate.
    ///
    /// The message is reported when the predicate rejects a value.
    pub fn new<F>(message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Guard {
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn check(&self, data: &Value) -> bool {
        (self.predicate)(data)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
