//! Builder API for definitions and transitions.
//!
//! A [`Definition`] is grown one state and one transition at a time. Every
//! step returns a new definition, so a partially built one can be shared and
//! extended in different directions.

pub mod definition;
pub mod error;
pub mod macros;
pub mod transition;

pub use definition::{Definition, RegistrationPolicy, DEFAULT_STATE_FIELD};
pub use error::BuildError;
pub use transition::TransitionBuilder;

use crate::core::StateName;
use crate::effects::ActionError;
use crate::schema::kind_of;
use serde_json::Value;
use stillwater::prelude::*;

/// Transition whose action shallow-merges an object payload into the current
/// data. A `null` payload keeps the data as it is.
///
/// # Example
///
/// ```
/// use waypoint::builder::merge_transition;
///
/// let publish = merge_transition::<()>("publish", "Draft", "Published")
///     .build()
///     .unwrap();
/// assert!(publish.matches("Draft", "publish"));
/// ```
pub fn merge_transition<Env>(
    name: impl Into<String>,
    from: impl Into<StateName>,
    to: impl Into<StateName>,
) -> TransitionBuilder<Env>
where
    Env: Clone + Send + Sync + 'static,
{
    TransitionBuilder::new(name)
        .from(from)
        .to(to)
        .action_fn(merge_payload)
}

/// Transition whose action carries the current data over unchanged.
pub fn carry_transition<Env>(
    name: impl Into<String>,
    from: impl Into<StateName>,
    to: impl Into<StateName>,
) -> TransitionBuilder<Env>
where
    Env: Clone + Send + Sync + 'static,
{
    TransitionBuilder::new(name)
        .from(from)
        .to(to)
        .action(|data, _payload| pure(data).boxed())
}

fn merge_payload(data: Value, payload: Value) -> Result<Value, ActionError> {
    match (data, payload) {
        (data, Value::Null) => Ok(data),
        (Value::Object(mut data), Value::Object(payload)) => {
            data.extend(payload);
            Ok(Value::Object(data))
        }
        (data, payload) => Err(ActionError::new(format!(
            "cannot merge {} payload into {} data",
            kind_of(&payload),
            kind_of(&data)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stillwater::effect::Effect;

    #[test]
    fn merge_overwrites_and_adds_keys() {
        let merged = merge_payload(
            json!({"title": "Hi", "views": 1}),
            json!({"views": 2, "publishedAt": 1000}),
        )
        .unwrap();

        assert_eq!(
            merged,
            json!({"title": "Hi", "views": 2, "publishedAt": 1000})
        );
    }

    #[test]
    fn merge_with_null_payload_keeps_data() {
        let data = json!({"title": "Hi"});
        assert_eq!(merge_payload(data.clone(), Value::Null).unwrap(), data);
    }

    #[test]
    fn merge_rejects_non_object_payload() {
        let err = merge_payload(json!({"title": "Hi"}), json!([1, 2])).unwrap_err();
        assert_eq!(err.message(), "cannot merge array payload into object data");
    }

    #[tokio::test]
    async fn carry_transition_returns_data_unchanged() {
        let touch = carry_transition::<()>("touch", "Draft", "Draft")
            .build()
            .unwrap();

        let data = json!({"title": "Hi"});
        let next = (touch.action)(data.clone(), json!({"ignored": true}))
            .run(&())
            .await
            .unwrap();

        assert_eq!(next, data);
    }
}
