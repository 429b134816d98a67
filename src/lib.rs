//! Waypoint: typed finite state machines over JSON data
//!
//! Each state of a machine carries its own data shape. A [`Definition`]
//! registers the states and the named transitions between them. An
//! [`Instance`] pins a definition to one state and data that was validated
//! against that state's shape.
//!
//! Instances never change. Executing a transition runs its action as a
//! Stillwater effect, validates the result against the destination shape and
//! returns a new instance, or an [`FsmError`] if any step fails.
//!
//! # Core Concepts
//!
//! - **Shapes**: per-state validation via the [`schema::StateShape`] trait
//! - **Definitions**: persistent registries of states and transitions
//! - **Instances**: immutable `(state, data)` pairs that execute transitions
//! - **Actions**: effects mapping `(data, payload)` to the next raw data
//!
//! # Example
//!
//! ```rust
//! use waypoint::schema::{FieldType, ObjectShape};
//! use waypoint::{Definition, FsmError, TransitionBuilder};
//! use serde_json::{json, Value};
//! use stillwater::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let draft = ObjectShape::new().field("title", FieldType::String);
//! let published = draft.clone().field("publishedAt", FieldType::Number);
//!
//! let blog = Definition::new()
//!     .add_state("Draft", draft)?
//!     .add_state("Published", published)?
//!     .add_transition(
//!         TransitionBuilder::new("publish")
//!             .from("Draft")
//!             .to("Published")
//!             .action(|data: Value, payload: Value| {
//!                 let mut next = data;
//!                 next["publishedAt"] = payload["at"].clone();
//!                 pure(next).boxed()
//!             }),
//!     )?;
//!
//! let post = blog.parse_state("Draft", &json!({"title": "Hello"}))?;
//! let live = post.execute("publish", json!({"at": 1000})).await?;
//! assert!(live.is("Published"));
//!
//! // Published posts cannot be published again.
//! let again = live.execute("publish", json!({"at": 2000})).await;
//! assert!(matches!(again, Err(FsmError::UnknownTransition { .. })));
//!
//! // The original instance is untouched.
//! assert!(post.is("Draft"));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod schema;

// Re-export commonly used types
pub use builder::{
    carry_transition, merge_transition, BuildError, Definition, RegistrationPolicy,
    TransitionBuilder,
};
pub use core::{Guard, Label, StateName};
pub use effects::{ActionError, FsmError, Instance, Transition, TransitionAction};
pub use schema::{FieldType, ObjectShape, StateShape, ValidationError};
