//! Shapes backed by Rust types.

use super::error::Issue;
use super::{Checked, StateShape};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use stillwater::validation::Validation;

/// Shape that accepts exactly the values `T` deserializes from.
///
/// The normalized data is `T` serialized back, so defaults and renames
/// declared on `T` apply. Unknown keys follow `T`'s own serde attributes.
///
/// # Example
///
/// ```rust
/// use waypoint::schema::{typed, StateShape};
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Serialize, Deserialize)]
/// struct Draft {
///     title: String,
/// }
///
/// let shape = typed::<Draft>();
/// assert!(shape.validate(&json!({"title": "Hi"})).is_success());
/// assert!(shape.validate(&json!({"title": 1})).is_failure());
/// ```
pub struct Typed<T> {
    _phantom: PhantomData<fn() -> T>,
}

/// Shape for the Rust type `T`.
pub fn typed<T>() -> Typed<T>
where
    T: Serialize + DeserializeOwned,
{
    Typed {
        _phantom: PhantomData,
    }
}

impl<T> StateShape for Typed<T>
where
    T: Serialize + DeserializeOwned,
{
    fn validate(&self, raw: &Value) -> Checked {
        let value: T = match serde_json::from_value(raw.clone()) {
            Ok(value) => value,
            Err(e) => return Validation::fail(Issue::custom(e.to_string())),
        };
        match serde_json::to_value(&value) {
            Ok(data) => Validation::success(data),
            Err(e) => Validation::fail(Issue::custom(e.to_string())),
        }
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Typed<{}>", std::any::type_name::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Published {
        title: String,
        published_at: u64,
        #[serde(default)]
        featured: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Closed {
        reason: String,
    }

    #[test]
    fn normalizes_through_the_type() {
        let shape = typed::<Published>();

        match shape.validate(&json!({"title": "Hi", "publishedAt": 1000, "extra": 1})) {
            Validation::Success(data) => assert_eq!(
                data,
                json!({"title": "Hi", "publishedAt": 1000, "featured": false})
            ),
            Validation::Failure(_) => panic!("expected success"),
        }
    }

    #[test]
    fn reports_serde_message() {
        let shape = typed::<Published>();

        match shape.validate(&json!({"title": "Hi"})) {
            Validation::Success(_) => panic!("expected failure"),
            Validation::Failure(issues) => {
                let issue = issues.iter().next().unwrap();
                assert!(issue.to_string().contains("publishedAt"));
            }
        }
    }

    #[test]
    fn respects_deny_unknown_fields() {
        let shape = typed::<Closed>();

        assert!(shape.validate(&json!({"reason": "done"})).is_success());
        assert!(shape.validate(&json!({"reason": "done", "x": 1})).is_failure());
    }

    #[test]
    fn debug_names_the_type() {
        let shape = typed::<Closed>();
        assert!(format!("{shape:?}").contains("Closed"));
    }
}
