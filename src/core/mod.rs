//! Core naming and predicate types.
//!
//! This module contains the pure building blocks shared by the rest of the
//! crate:
//! - State names and the `Label` trait for enum-backed names
//! - Guard predicates over state data
//!
//! Nothing here performs effects.

mod guard;
mod state;

pub use guard::Guard;
pub use state::{Label, StateName};
