//! The definition registry: states, their shapes and the transitions between
//! them.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::StateName;
use crate::effects::{FsmError, Instance, Transition};
use crate::schema::{self, StateShape};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Field a self-describing input uses to name its state, unless configured
/// otherwise with [`Definition::with_state_field`].
pub const DEFAULT_STATE_FIELD: &str = "state";

/// When a transition's `from` and `to` states are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationPolicy {
    /// `add_transition` rejects states that are not registered yet.
    #[default]
    Strict,

    /// `add_transition` accepts any state name. A transition from an unknown
    /// state can never match; one into an unknown state fails with
    /// `UnknownState` when executed, before its action runs.
    Deferred,
}

/// Registry of the states and transitions of one machine.
///
/// Growing a definition never changes it: `add_state` and `add_transition`
/// return a new definition and the receiver keeps behaving as before. Shapes
/// and transitions are shared between the two through `Arc`, only the
/// top-level collection is copied.
///
/// # Example
///
/// ```rust
/// use waypoint::schema::{FieldType, ObjectShape};
/// use waypoint::{merge_transition, Definition};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let draft = ObjectShape::new().field("title", FieldType::String);
/// let published = draft.clone().field("publishedAt", FieldType::Number);
///
/// let blog = Definition::new()
///     .add_state("Draft", draft)?
///     .add_state("Published", published)?
///     .add_transition(merge_transition("publish", "Draft", "Published"))?;
///
/// let post = blog.parse(&json!({"state": "Draft", "title": "Hi"}))?;
/// let live = post.execute("publish", json!({"publishedAt": 1000})).await?;
///
/// assert_eq!(live.state(), "Published");
/// assert_eq!(live.data(), &json!({"title": "Hi", "publishedAt": 1000}));
/// # Ok(())
/// # }
/// ```
pub struct Definition<Env = ()> {
    states: Arc<BTreeMap<StateName, Arc<dyn StateShape>>>,
    transitions: Arc<Vec<Transition<Env>>>,
    policy: RegistrationPolicy,
    state_field: Arc<str>,
}

impl Definition<()> {
    /// Create an empty definition whose actions need no environment.
    ///
    /// Use [`Definition::default`] to pick another environment type.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Env: Clone + Send + Sync + 'static> Definition<Env> {
    /// Set when transition endpoints are checked.
    ///
    /// The policy applies to transitions added from now on. Transitions
    /// already registered are kept as they are, even when switching to
    /// [`RegistrationPolicy::Strict`].
    pub fn with_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the field [`parse`](Self::parse) reads the state name from.
    pub fn with_state_field(mut self, field: impl Into<String>) -> Self {
        self.state_field = Arc::from(field.into());
        self
    }

    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    pub fn state_field(&self) -> &str {
        &self.state_field
    }

    /// Return a new definition with the state `name` validated by `shape`.
    pub fn add_state(
        &self,
        name: impl Into<StateName>,
        shape: impl StateShape + 'static,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        if self.states.contains_key(&name) {
            return Err(BuildError::DuplicateState {
                state: name.to_string(),
            });
        }

        let mut states = (*self.states).clone();
        states.insert(name.clone(), Arc::new(shape));
        tracing::trace!(state = %name, "state registered");

        Ok(Self {
            states: Arc::new(states),
            transitions: Arc::clone(&self.transitions),
            policy: self.policy,
            state_field: Arc::clone(&self.state_field),
        })
    }

    /// Return a new definition with the transition built from `builder`
    /// appended after the existing ones.
    pub fn add_transition(&self, builder: TransitionBuilder<Env>) -> Result<Self, BuildError> {
        let transition = builder.build()?;

        if self.policy == RegistrationPolicy::Strict {
            if !self.has_state(transition.from.as_str()) {
                return Err(BuildError::UnknownSourceState {
                    transition: transition.name,
                    state: transition.from.to_string(),
                });
            }
            if !self.has_state(transition.to.as_str()) {
                return Err(BuildError::UnknownTargetState {
                    transition: transition.name,
                    state: transition.to.to_string(),
                });
            }
        }

        tracing::trace!(
            transition = %transition.name,
            from = %transition.from,
            to = %transition.to,
            "transition registered"
        );
        let mut transitions = (*self.transitions).clone();
        transitions.push(transition);

        Ok(Self {
            states: Arc::clone(&self.states),
            transitions: Arc::new(transitions),
            policy: self.policy,
            state_field: Arc::clone(&self.state_field),
        })
    }

    /// Parse a self-describing input such as `{"state": "Draft", ...}`.
    ///
    /// The whole input, state field included, is validated as in
    /// [`parse_state`](Self::parse_state). A shape that does not declare the
    /// field drops it under [`UnknownKeys::Strip`](crate::schema::UnknownKeys)
    /// and rejects it when strict.
    pub fn parse(&self, input: &Value) -> Result<Instance<Env>, FsmError> {
        let field = self.state_field();
        let Some(state) = input.get(field).and_then(Value::as_str) else {
            return Err(FsmError::UntaggedInput {
                field: field.to_string(),
            });
        };
        if !self.has_state(state) {
            return Err(FsmError::UnknownState {
                state: state.to_string(),
            });
        }

        self.parse_state(state, input)
    }

    /// Validate `input` as data of `state` and pin an instance to it.
    pub fn parse_state(
        &self,
        state: impl AsRef<str>,
        input: &Value,
    ) -> Result<Instance<Env>, FsmError> {
        let state = state.as_ref();
        let Some((name, shape)) = self.states.get_key_value(state) else {
            return Err(FsmError::UnknownState {
                state: state.to_string(),
            });
        };

        let data = schema::check(name, shape.as_ref(), input).map_err(|err| {
            tracing::debug!(state = %name, issues = err.issues.len(), "input rejected");
            err
        })?;

        tracing::debug!(state = %name, "instance parsed");
        Ok(Instance::new(self.clone(), name.clone(), data))
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// Registered state names, in name order.
    pub fn state_names(&self) -> impl Iterator<Item = &StateName> {
        self.states.keys()
    }

    /// Every transition, in registration order.
    pub fn transitions(&self) -> &[Transition<Env>] {
        &self.transitions
    }

    /// Transitions leaving `state`, in registration order.
    pub fn transitions_from<'a>(
        &'a self,
        state: &'a str,
    ) -> impl Iterator<Item = &'a Transition<Env>> + 'a {
        self.transitions.iter().filter(move |t| t.from == state)
    }

    /// True if no transition leaves `state`.
    pub fn is_terminal(&self, state: &str) -> bool {
        self.transitions_from(state).next().is_none()
    }

    /// First transition registered as `name` from `state`.
    pub(crate) fn find_transition(&self, state: &str, name: &str) -> Option<&Transition<Env>> {
        self.transitions.iter().find(|t| t.matches(state, name))
    }

    pub(crate) fn shape(&self, state: &str) -> Option<&Arc<dyn StateShape>> {
        self.states.get(state)
    }
}

impl<Env> Default for Definition<Env> {
    fn default() -> Self {
        Self {
            states: Arc::new(BTreeMap::new()),
            transitions: Arc::new(Vec::new()),
            policy: RegistrationPolicy::default(),
            state_field: Arc::from(DEFAULT_STATE_FIELD),
        }
    }
}

impl<Env> Clone for Definition<Env> {
    fn clone(&self) -> Self {
        Self {
            states: Arc::clone(&self.states),
            transitions: Arc::clone(&self.transitions),
            policy: self.policy,
            state_field: Arc::clone(&self.state_field),
        }
    }
}

impl<Env> fmt::Debug for Definition<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("transitions", &self.transitions)
            .field("policy", &self.policy)
            .field("state_field", &self.state_field)
            .finish()
    }
}
