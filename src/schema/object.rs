//! Declarative object shapes.

use super::error::{kind_of, FieldPath, Issue, IssueKind};
use super::{Checked, StateShape};
use crate::core::Guard;
use serde_json::{Map, Value};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// What an object shape does with keys it does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Drop undeclared keys from the normalized data.
    #[default]
    Strip,

    /// Reject undeclared keys.
    Strict,

    /// Keep undeclared keys as they are.
    Passthrough,
}

/// Expected type of a field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Any,
    String,
    Number,
    /// A number without a fractional part.
    Integer,
    Boolean,
    Literal(Value),
    Array(Box<FieldType>),
    Object(ObjectShape),
    /// The field may be absent. An absent field stays absent in the output.
    Optional(Box<FieldType>),
    /// The field may be `null`.
    Nullable(Box<FieldType>),
}

impl FieldType {
    pub fn array(item: FieldType) -> Self {
        Self::Array(Box::new(item))
    }

    pub fn optional(inner: FieldType) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn nullable(inner: FieldType) -> Self {
        Self::Nullable(Box::new(inner))
    }

    fn expected(&self) -> String {
        match self {
            Self::Any => "any value".to_string(),
            Self::String => "string".to_string(),
            Self::Number => "number".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Literal(value) => format!("literal {value}"),
            Self::Array(item) => format!("array of {}", item.expected()),
            Self::Object(_) => "object".to_string(),
            Self::Optional(inner) => inner.expected(),
            Self::Nullable(inner) => format!("{} or null", inner.expected()),
        }
    }

    fn validate_at(&self, value: &Value, path: &FieldPath) -> Checked {
        let mismatch = || -> Checked {
            Validation::fail(Issue::new(
                path.clone(),
                IssueKind::TypeMismatch {
                    expected: self.expected(),
                    found: kind_of(value),
                },
            ))
        };

        match self {
            Self::Any => Validation::success(value.clone()),
            Self::String if value.is_string() => Validation::success(value.clone()),
            Self::Number if value.is_number() => Validation::success(value.clone()),
            Self::Integer if is_integer(value) => Validation::success(value.clone()),
            Self::Boolean if value.is_boolean() => Validation::success(value.clone()),
            Self::Literal(expected) => {
                if value == expected {
                    Validation::success(value.clone())
                } else {
                    Validation::fail(Issue::new(
                        path.clone(),
                        IssueKind::LiteralMismatch {
                            expected: expected.clone(),
                            found: value.clone(),
                        },
                    ))
                }
            }
            Self::Array(item) => match value.as_array() {
                Some(elements) => {
                    let checks: Vec<Checked> = elements
                        .iter()
                        .enumerate()
                        .map(|(i, element)| item.validate_at(element, &path.index(i)))
                        .collect();
                    match Validation::all_vec(checks) {
                        Validation::Success(elements) => Validation::success(Value::Array(elements)),
                        Validation::Failure(issues) => Validation::Failure(issues),
                    }
                }
                None => mismatch(),
            },
            Self::Object(shape) => shape.validate_at(value, path),
            Self::Optional(inner) => inner.validate_at(value, path),
            Self::Nullable(inner) => {
                if value.is_null() {
                    Validation::success(Value::Null)
                } else {
                    inner.validate_at(value, path)
                }
            }
            _ => mismatch(),
        }
    }
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0)
}

/// Shape of an object: declared fields, a policy for undeclared keys and
/// optional guards over the whole object.
///
/// # Example
///
/// ```rust
/// use waypoint::schema::{FieldType, ObjectShape, StateShape};
/// use stillwater::validation::Validation;
/// use serde_json::json;
///
/// let draft = ObjectShape::new().field("title", FieldType::String);
/// let published = draft.clone().field("publishedAt", FieldType::Number);
///
/// match published.validate(&json!({"title": "Hi", "publishedAt": 1000, "x": 1})) {
///     Validation::Success(data) => assert_eq!(data, json!({"title": "Hi", "publishedAt": 1000})),
///     Validation::Failure(_) => panic!("expected success"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectShape {
    fields: Vec<(String, FieldType)>,
    unknown_keys: UnknownKeys,
    guards: Vec<Guard>,
}

impl ObjectShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required field. Redeclaring a field replaces its type.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = ty,
            None => self.fields.push((name, ty)),
        }
        self
    }

    /// Declare a field that may be absent.
    pub fn optional(self, name: impl Into<String>, ty: FieldType) -> Self {
        self.field(name, FieldType::optional(ty))
    }

    /// Add every field of `other`, replacing same-named fields.
    pub fn extend(self, other: &ObjectShape) -> Self {
        other
            .fields
            .iter()
            .fold(self, |shape, (name, ty)| shape.field(name.clone(), ty.clone()))
    }

    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    /// Reject undeclared keys.
    pub fn strict(self) -> Self {
        self.unknown_keys(UnknownKeys::Strict)
    }

    /// Keep undeclared keys in the normalized data.
    pub fn passthrough(self) -> Self {
        self.unknown_keys(UnknownKeys::Passthrough)
    }

    /// Add a guard over the whole object. Guards only run once every field
    /// has passed, and see the normalized object.
    pub fn refine<F>(mut self, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.guards.push(Guard::new(message, predicate));
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    fn declares(&self, key: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == key)
    }

    fn validate_at(&self, raw: &Value, path: &FieldPath) -> Checked {
        let Some(object) = raw.as_object() else {
            return Validation::fail(Issue::new(
                path.clone(),
                IssueKind::TypeMismatch {
                    expected: "object".to_string(),
                    found: kind_of(raw),
                },
            ));
        };

        let mut checks: Vec<Validation<Option<(String, Value)>, NonEmptyVec<Issue>>> = Vec::new();

        for (name, ty) in &self.fields {
            let child = path.child(name);
            match (object.get(name), ty) {
                (None, FieldType::Optional(_)) => {}
                (None, _) => checks.push(Validation::fail(Issue::new(child, IssueKind::Missing))),
                (Some(value), ty) => checks.push(
                    ty.validate_at(value, &child)
                        .map(|data| Some((name.clone(), data))),
                ),
            }
        }

        for (key, value) in object {
            if self.declares(key) {
                continue;
            }
            match self.unknown_keys {
                UnknownKeys::Strip => {}
                UnknownKeys::Strict => checks.push(Validation::fail(Issue::new(
                    path.child(key),
                    IssueKind::Unrecognized,
                ))),
                UnknownKeys::Passthrough => {
                    checks.push(Validation::success(Some((key.clone(), value.clone()))))
                }
            }
        }

        let normalized = match Validation::all_vec(checks) {
            Validation::Success(entries) => {
                Value::Object(entries.into_iter().flatten().collect::<Map<String, Value>>())
            }
            Validation::Failure(issues) => return Validation::Failure(issues),
        };

        let refinements: Vec<Validation<(), NonEmptyVec<Issue>>> = self
            .guards
            .iter()
            .map(|guard| {
                if guard.check(&normalized) {
                    Validation::success(())
                } else {
                    Validation::fail(Issue::new(
                        path.clone(),
                        IssueKind::Custom(guard.message().to_string()),
                    ))
                }
            })
            .collect();

        match Validation::all_vec(refinements) {
            Validation::Success(_) => Validation::success(normalized),
            Validation::Failure(issues) => Validation::Failure(issues),
        }
    }
}

impl StateShape for ObjectShape {
    fn validate(&self, raw: &Value) -> Checked {
        self.validate_at(raw, &FieldPath::root())
    }
}
