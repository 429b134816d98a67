//! Immutable instances and the execute engine.

use crate::builder::Definition;
use crate::core::{Label, StateName};
use crate::effects::error::FsmError;
use crate::schema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use stillwater::effect::Effect;

/// A value pinned to one state, holding data validated against that state's
/// shape.
///
/// Instances never change. [`execute_with`](Self::execute_with) produces a new
/// instance and leaves the receiver as it was, whether it succeeds or fails.
pub struct Instance<Env = ()> {
    state: StateName,
    data: Value,
    definition: Definition<Env>,
}

impl<Env: Clone + Send + Sync + 'static> Instance<Env> {
    pub(crate) fn new(definition: Definition<Env>, state: StateName, data: Value) -> Self {
        Self {
            state,
            data,
            definition,
        }
    }

    /// Get current state (pure)
    pub fn state(&self) -> &StateName {
        &self.state
    }

    /// Get the validated data (pure)
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Deserialize the data into a Rust type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }

    pub fn is(&self, state: impl AsRef<str>) -> bool {
        self.state == state.as_ref()
    }

    /// The current state as a label enum, if the enum has a matching variant.
    pub fn label<L: Label>(&self) -> Option<L> {
        L::from_name(self.state.as_str())
    }

    /// The definition this instance resolves transitions against.
    pub fn definition(&self) -> &Definition<Env> {
        &self.definition
    }

    /// Names of the transitions executable from the current state, in
    /// registration order, without duplicates.
    pub fn available_transitions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for transition in self.definition.transitions_from(self.state.as_str()) {
            if !names.contains(&transition.name.as_str()) {
                names.push(transition.name.as_str());
            }
        }
        names
    }

    pub fn can_execute(&self, transition: impl AsRef<str>) -> bool {
        self.definition
            .find_transition(self.state.as_str(), transition.as_ref())
            .is_some()
    }

    /// True if no transition leaves the current state.
    pub fn is_terminal(&self) -> bool {
        self.definition.is_terminal(self.state.as_str())
    }

    /// The data with the state name set under the definition's state field,
    /// in the form [`Definition::parse`] accepts. A state field the data
    /// already carries is overwritten with the same name.
    ///
    /// Returns `None` when the data is not an object.
    pub fn to_tagged(&self) -> Option<Value> {
        let mut object = self.data.as_object()?.clone();
        object.insert(
            self.definition.state_field().to_string(),
            Value::String(self.state.to_string()),
        );
        Some(Value::Object(object))
    }

    /// Execute the transition called `transition` from the current state.
    ///
    /// The first transition registered with a matching `(from, name)` pair
    /// is used. Its action runs against `env` with a copy of the current data
    /// and `payload`; the action's output is validated against the
    /// destination shape and becomes the data of the returned instance.
    pub async fn execute_with(
        &self,
        transition: impl AsRef<str>,
        payload: Value,
        env: &Env,
    ) -> Result<Instance<Env>, FsmError> {
        let name = transition.as_ref();

        let Some(found) = self.definition.find_transition(self.state.as_str(), name) else {
            tracing::debug!(state = %self.state, transition = name, "no transition matches");
            return Err(FsmError::UnknownTransition {
                transition: name.to_string(),
                state: self.state.clone(),
            });
        };

        // Only reachable with RegistrationPolicy::Deferred. Resolved before the
        // action runs.
        let shape = self
            .definition
            .shape(found.to.as_str())
            .ok_or_else(|| FsmError::UnknownState {
                state: found.to.to_string(),
            })?;

        let raw = (found.action)(self.data.clone(), payload)
            .run(env)
            .await
            .map_err(|source| {
                tracing::debug!(state = %self.state, transition = name, error = %source, "action failed");
                FsmError::ActionFailed {
                    transition: name.to_string(),
                    state: self.state.clone(),
                    source,
                }
            })?;

        let data = schema::check(&found.to, shape.as_ref(), &raw)?;

        tracing::debug!(
            from = %self.state,
            to = %found.to,
            transition = name,
            "transition executed"
        );

        Ok(Instance::new(
            self.definition.clone(),
            found.to.clone(),
            data,
        ))
    }
}

impl Instance<()> {
    /// [`execute_with`](Self::execute_with) for machines without an environment.
    pub async fn execute(
        &self,
        transition: impl AsRef<str>,
        payload: Value,
    ) -> Result<Instance<()>, FsmError> {
        self.execute_with(transition, payload, &()).await
    }
}

impl<Env> Clone for Instance<Env> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            data: self.data.clone(),
            definition: self.definition.clone(),
        }
    }
}

/// Instances are equal when they are in the same state with equal data.
impl<Env> PartialEq for Instance<Env> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.data == other.data
    }
}

impl<Env> fmt::Debug for Instance<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("state", &self.state)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
