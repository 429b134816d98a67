//! Instances and effectful transitions, built on Stillwater 0.11.0.
//!
//! This module is the "imperative shell" of the crate: transition actions are
//! effects that may suspend on I/O, and executing one produces a new instance.
//!
//! # Key Concepts
//!
//! - **Transitions**: named `(from, to)` pairs with an action factory
//! - **Instances**: immutable `(state, data)` values that execute transitions
//! - **Effects**: actions return `BoxedEffect`, run against a caller-supplied
//!   environment
//!
//! Use the free-standing constructors `pure()`, `fail()` and `from_fn()` from
//! `stillwater::prelude` to write actions.

mod error;
mod instance;
mod transition;

pub use error::FsmError;
pub use instance::Instance;
pub use transition::{ActionError, Transition, TransitionAction};
