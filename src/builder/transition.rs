//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::StateName;
use crate::effects::{ActionError, Transition, TransitionAction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;

/// Builder for constructing transitions with a fluent API.
///
/// Pass the builder to [`Definition::add_transition`](crate::Definition::add_transition),
/// which builds and registers it.
pub struct TransitionBuilder<Env> {
    name: String,
    from: Option<StateName>,
    to: Option<StateName>,
    action: Option<TransitionAction<Env>>,
}

impl<Env: Clone + Send + Sync + 'static> TransitionBuilder<Env> {
    /// Create a builder for the transition called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: None,
            to: None,
            action: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: impl Into<StateName>) -> Self {
        self.from = Some(state.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<StateName>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Set the action effect factory (required).
    ///
    /// The factory receives the current data and the payload and returns a
    /// fresh effect computing the raw destination data.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(Value, Value) -> BoxedEffect<Value, ActionError, Env> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Set a synchronous action.
    pub fn action_fn<F>(self, action: F) -> Self
    where
        F: Fn(Value, Value) -> Result<Value, ActionError> + Send + Sync + 'static,
    {
        self.action(move |data, payload| match action(data, payload) {
            Ok(next) => pure(next).boxed(),
            Err(e) => fail(e).boxed(),
        })
    }

    /// Set an action written against Rust types.
    ///
    /// The current data is deserialized into `Current`, the payload into
    /// `Payload`, and the `Next` value the effect yields is serialized back
    /// before it is validated against the destination shape. A payload that
    /// does not deserialize fails the action.
    pub fn typed_action<Current, Payload, Next, F>(self, action: F) -> Self
    where
        Current: DeserializeOwned,
        Payload: DeserializeOwned,
        Next: Serialize + Send + 'static,
        F: Fn(Current, Payload) -> BoxedEffect<Next, ActionError, Env> + Send + Sync + 'static,
    {
        self.action(move |data, payload| {
            let current: Current = match serde_json::from_value(data) {
                Ok(current) => current,
                Err(e) => {
                    return fail(ActionError::with_source(
                        "current data does not fit the action's input type",
                        e,
                    ))
                    .boxed()
                }
            };
            let payload: Payload = match serde_json::from_value(payload) {
                Ok(payload) => payload,
                Err(e) => {
                    return fail(ActionError::with_source(
                        "payload does not fit the action's payload type",
                        e,
                    ))
                    .boxed()
                }
            };

            action(current, payload)
                .and_then(|next| match serde_json::to_value(next) {
                    Ok(raw) => pure(raw).boxed(),
                    Err(e) => {
                        fail(ActionError::with_source("action output is not serializable", e))
                            .boxed()
                    }
                })
                .boxed()
        })
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<Env>, BuildError> {
        if self.name.is_empty() {
            return Err(BuildError::MissingName);
        }
        let Some(from) = self.from else {
            return Err(BuildError::MissingFromState {
                transition: self.name,
            });
        };
        let Some(to) = self.to else {
            return Err(BuildError::MissingToState {
                transition: self.name,
            });
        };
        let Some(action) = self.action else {
            return Err(BuildError::MissingAction {
                transition: self.name,
            });
        };

        Ok(Transition {
            name: self.name,
            from,
            to,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stillwater::effect::Effect;

    #[test]
    fn builder_validates_required_fields() {
        let result = TransitionBuilder::<()>::new("publish").from("Draft").build();

        assert!(matches!(
            result,
            Err(BuildError::MissingToState { ref transition }) if transition == "publish"
        ));
    }

    #[test]
    fn builder_validates_missing_source() {
        let result = TransitionBuilder::<()>::new("publish").to("Published").build();
        assert!(matches!(result, Err(BuildError::MissingFromState { .. })));
    }

    #[test]
    fn builder_validates_missing_action() {
        let result = TransitionBuilder::<()>::new("publish")
            .from("Draft")
            .to("Published")
            .build();

        assert!(matches!(result, Err(BuildError::MissingAction { .. })));
    }

    #[test]
    fn builder_rejects_empty_name() {
        let result = TransitionBuilder::<()>::new("")
            .from("Draft")
            .to("Published")
            .action_fn(|data, _| Ok(data))
            .build();

        assert_eq!(result.unwrap_err(), BuildError::MissingName);
    }

    #[test]
    fn fluent_api_builds_transition() {
        let transition = TransitionBuilder::<()>::new("publish")
            .from("Draft")
            .to("Published")
            .action(|data, _payload| pure(data).boxed())
            .build()
            .unwrap();

        assert_eq!(transition.name, "publish");
        assert_eq!(transition.from, "Draft");
        assert_eq!(transition.to, "Published");
        assert!(transition.matches("Draft", "publish"));
    }

    #[tokio::test]
    async fn action_fn_maps_errors_to_failed_effects() {
        let transition = TransitionBuilder::<()>::new("check")
            .from("A")
            .to("B")
            .action_fn(|_data, payload| {
                if payload["ok"] == json!(true) {
                    Ok(json!({"checked": true}))
                } else {
                    Err(ActionError::new("not ok"))
                }
            })
            .build()
            .unwrap();

        let ok = (transition.action)(json!({}), json!({"ok": true}))
            .run(&())
            .await
            .unwrap();
        assert_eq!(ok, json!({"checked": true}));

        let err = (transition.action)(json!({}), json!({"ok": false}))
            .run(&())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "not ok");
    }
}
