//! Environment variable types

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::scope::{EnvironmentId, Scope};

/// A primitive variable value as it appears in the variables JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// Text value.
    String(String),
    /// Numeric value, kept in its JSON representation.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Explicit `null`.
    Null,
}

impl VariableValue {
    /// Returns the string payload for text values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for VariableValue {
    /// Formats the value the way it is substituted into a request.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for VariableValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for VariableValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl TryFrom<Value> for VariableValue {
    type Error = Value;

    /// Accepts JSON primitives; arrays and objects are handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::String(s)),
            Value::Number(n) => Ok(Self::Number(n)),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Null => Ok(Self::Null),
            other @ (Value::Array(_) | Value::Object(_)) => Err(other),
        }
    }
}

/// Variables keyed by name, in insertion order.
pub type VariableMap = IndexMap<String, VariableValue>;

/// Structural equality of two variable maps.
///
/// Key order is ignored. Numbers compare by numeric value, so `1` and `1.0` are equal;
/// two integers compare exactly.
#[must_use]
pub fn variables_equal(left: &VariableMap, right: &VariableMap) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(name, value)| right.get(name).is_some_and(|other| values_equal(value, other)))
}

#[allow(clippy::float_cmp)]
fn values_equal(left: &VariableValue, right: &VariableValue) -> bool {
    match (left, right) {
        (VariableValue::Number(l), VariableValue::Number(r)) if !l.is_f64() && !r.is_f64() => {
            l == r
        }
        (VariableValue::Number(l), VariableValue::Number(r)) => {
            matches!((l.as_f64(), r.as_f64()), (Some(l), Some(r)) if l == r)
        }
        _ => left == right,
    }
}

/// A named set of variables belonging to one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    id: EnvironmentId,
    name: String,
    scope: Scope,
    variables: VariableMap,
}

impl Environment {
    /// Creates an empty environment with a freshly generated id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(EnvironmentId::generate(), name)
    }

    /// Creates an empty environment with a known id.
    #[must_use]
    pub fn with_id(id: impl Into<EnvironmentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scope: Scope::Workspace,
            variables: VariableMap::new(),
        }
    }

    /// Replaces the variables, builder style.
    #[must_use]
    pub fn with_variables(mut self, variables: VariableMap) -> Self {
        self.variables = variables;
        self
    }

    /// Adds a variable, builder style.
    #[must_use]
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        value: impl Into<VariableValue>,
    ) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Returns the environment id.
    #[must_use]
    pub const fn id(&self) -> &EnvironmentId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scope this environment is registered in.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns the committed variables.
    #[must_use]
    pub const fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// Gets a variable by name.
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&VariableValue> {
        self.variables.get(name)
    }

    /// Returns the number of variables in this environment.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub(crate) const fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    pub(crate) fn replace_variables(&mut self, variables: VariableMap) {
        self.variables = variables;
    }
}
