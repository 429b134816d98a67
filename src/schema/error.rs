//! Validation issues and the error reported for a rejected value.

use crate::core::StateName;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Location of an issue inside a value, e.g. `items[0].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path to a field of the object at this path.
    pub fn child(&self, field: &str) -> Self {
        if self.0.is_empty() {
            Self(field.to_string())
        } else {
            Self(format!("{}.{}", self.0, field))
        }
    }

    /// Path to an element of the array at this path.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("(root)")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// What went wrong at a path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IssueKind {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("required field is missing")]
    Missing,

    #[error("unrecognized field")]
    Unrecognized,

    #[error("expected literal {expected}, found {found}")]
    LiteralMismatch { expected: Value, found: Value },

    #[error("{0}")]
    Custom(String),
}

/// A single reason a value was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path}: {kind}")]
pub struct Issue {
    pub path: FieldPath,
    pub kind: IssueKind,
}

impl Issue {
    pub fn new(path: FieldPath, kind: IssueKind) -> Self {
        Self { path, kind }
    }

    /// Issue at the root of the value with a free-form message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(FieldPath::root(), IssueKind::Custom(message.into()))
    }
}

/// A value did not conform to the shape registered for `state`.
///
/// Carries every issue found, not only the first one.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("data for state '{state}' failed validation: {}", join_issues(.issues))]
pub struct ValidationError {
    pub state: StateName,
    pub issues: Vec<Issue>,
}

impl ValidationError {
    /// Issues reported at `path`; the root is the empty string.
    pub fn issues_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |i| i.path.as_str() == path)
    }
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Name of a JSON value's kind, used in type mismatch reports.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
