//! State names and enum-backed labels.
//!
//! States and transitions are identified by plain strings at runtime. The
//! `Label` trait lets an application name them with fieldless enums instead,
//! so typos become compile errors rather than `UnknownState` failures.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Debug, Display};

/// Name of a state registered in a [`Definition`](crate::Definition).
///
/// # Example
///
/// ```rust
/// use waypoint::core::StateName;
///
/// let name = StateName::from("Draft");
/// assert_eq!(name.as_str(), "Draft");
/// assert_eq!(name, "Draft");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateName(String);

impl StateName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StateName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StateName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&StateName> for StateName {
    fn from(s: &StateName) -> Self {
        s.clone()
    }
}

impl PartialEq<str> for StateName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StateName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Trait for fieldless enums that name states or transitions.
///
/// Usually implemented through [`label_enum!`](crate::label_enum).
///
/// # Example
///
/// ```rust
/// use waypoint::core::Label;
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Light {
///     Red,
///     Green,
/// }
///
/// impl Label for Light {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Red => "Red",
///             Self::Green => "Green",
///         }
///     }
///
///     fn from_name(name: &str) -> Option<Self> {
///         match name {
///             "Red" => Some(Self::Red),
///             "Green" => Some(Self::Green),
///             _ => None,
///         }
///     }
///
///     fn all() -> &'static [Self] {
///         &[Self::Red, Self::Green]
///     }
/// }
///
/// assert_eq!(Light::from_name("Green"), Some(Light::Green));
/// assert_eq!(Light::all().len(), 2);
/// ```
pub trait Label: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// The runtime name used in definitions and raw input.
    fn name(&self) -> &'static str;

    /// Resolve a runtime name back to its variant.
    fn from_name(name: &str) -> Option<Self>;

    /// Every variant, in declaration order.
    fn all() -> &'static [Self];
}
