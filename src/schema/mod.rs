//! Validation of state data.
//!
//! Every state in a [`Definition`](crate::Definition) is registered with a
//! shape: something that takes a raw value and either returns the normalized
//! data for that state or reports why the value does not conform.
//!
//! Shapes use Stillwater's `Validation` type so that ALL issues are reported in
//! one pass instead of stopping at the first bad field.
//!
//! # Example
//!
//! ```rust
//! use waypoint::schema::{FieldType, ObjectShape, StateShape};
//! use serde_json::json;
//!
//! let draft = ObjectShape::new().field("title", FieldType::String);
//!
//! assert!(draft.validate(&json!({"title": "Hi"})).is_success());
//! assert!(draft.validate(&json!({"title": 123})).is_failure());
//! ```

mod error;
mod object;
mod typed;

pub use error::{FieldPath, Issue, IssueKind, ValidationError};
pub use object::{FieldType, ObjectShape, UnknownKeys};
pub use typed::{typed, Typed};

pub(crate) use error::kind_of;

use crate::core::StateName;
use serde_json::Value;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of validating a raw value: normalized data or every issue found.
pub type Checked = Validation<Value, NonEmptyVec<Issue>>;

/// The data format associated with one state.
///
/// Implementations must be deterministic: the same input always yields the
/// same outcome. On success the returned value becomes the instance data, so a
/// shape may normalize (drop unknown keys, fill in representations) as long as
/// validating its own output succeeds again.
pub trait StateShape: Send + Sync {
    fn validate(&self, raw: &Value) -> Checked;
}

impl<F> StateShape for F
where
    F: Fn(&Value) -> Checked + Send + Sync,
{
    fn validate(&self, raw: &Value) -> Checked {
        self(raw)
    }
}

/// Run `raw` through `shape`, attributing any failure to `state`.
pub(crate) fn check(
    state: &StateName,
    shape: &dyn StateShape,
    raw: &Value,
) -> Result<Value, ValidationError> {
    match shape.validate(raw) {
        Validation::Success(data) => Ok(data),
        Validation::Failure(issues) => Err(ValidationError {
            state: state.clone(),
            issues: issues.iter().cloned().collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn non_empty_string(raw: &Value) -> Checked {
        match raw.as_str() {
            Some(s) if !s.is_empty() => Validation::success(raw.clone()),
            _ => Validation::fail(Issue::custom("expected a non-empty string")),
        }
    }

    #[test]
    fn functions_act_as_shapes() {
        let shape: &dyn StateShape = &non_empty_string;

        assert!(shape.validate(&json!("ok")).is_success());
        assert!(shape.validate(&json!("")).is_failure());
    }

    #[test]
    fn check_returns_normalized_data() {
        let shape = ObjectShape::new().field("title", FieldType::String);
        let data = check(
            &StateName::from("Draft"),
            &shape,
            &json!({"title": "Hi", "ignored": true}),
        )
        .unwrap();

        assert_eq!(data, json!({"title": "Hi"}));
    }

    #[test]
    fn check_attributes_failures_to_state() {
        let shape = ObjectShape::new()
            .field("title", FieldType::String)
            .field("words", FieldType::Integer);
        let err = check(&StateName::from("Draft"), &shape, &json!({"title": 1})).unwrap_err();

        assert_eq!(err.state, "Draft");
        assert_eq!(err.issues.len(), 2);
    }
}
