//! Read-only view over a loaded configuration tree.
//!
//! Configuration arrives as an untyped `serde_json::Value` (merged from
//! file, environment and defaults upstream). Fields may be missing, `null`,
//! or carry the wrong type, and each of those cases has to be observable
//! by the validator. `Field` makes that distinction explicit.

use std::fmt;

use serde_json::{Map, Value};

/// A single configuration field as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    /// Key not present in the parent mapping.
    Absent,
    /// Key present with an explicit `null`.
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    Array(&'a [Value]),
    Object(&'a Map<String, Value>),
}

impl<'a> Field<'a> {
    /// Wrap an optional value, typically the result of `Map::get`.
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None => Field::Absent,
            Some(Value::Null) => Field::Null,
            Some(Value::Bool(b)) => Field::Bool(*b),
            // Without arbitrary_precision every serde_json number fits an f64.
            Some(Value::Number(n)) => n.as_f64().map_or(Field::Null, Field::Number),
            Some(Value::String(s)) => Field::String(s),
            Some(Value::Array(items)) => Field::Array(items),
            Some(Value::Object(map)) => Field::Object(map),
        }
    }

    /// The root of a configuration tree.
    pub fn root(value: &'a Value) -> Self {
        Self::of(Some(value))
    }

    /// Child field lookup. Anything other than an object has no children.
    pub fn get(self, key: &str) -> Field<'a> {
        match self {
            Field::Object(map) => Field::of(map.get(key)),
            _ => Field::Absent,
        }
    }

    /// Walk a dotted sequence of keys.
    pub fn at(self, path: &[&str]) -> Field<'a> {
        path.iter().fold(self, |field, key| field.get(key))
    }

    /// The key exists, even if its value is `null`.
    pub fn is_present(&self) -> bool {
        !matches!(self, Field::Absent)
    }

    /// The key exists and carries a non-null value.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Field::Absent | Field::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Field::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Field::String(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&'a Map<String, Value>> {
        match self {
            Field::Object(map) => Some(*map),
            _ => None,
        }
    }
}

/// Renders the raw value the way it appears in error messages
/// (`millenia`, `5`, `true`, `null`).
impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Absent => write!(f, "undefined"),
            Field::Null => write!(f, "null"),
            Field::Bool(b) => write!(f, "{}", b),
            Field::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Field::Number(n) => write!(f, "{}", n),
            Field::String(s) => write!(f, "{}", s),
            Field::Array(items) => write!(f, "{}", Value::Array(items.to_vec())),
            Field::Object(map) => write!(f, "{}", Value::Object((*map).clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_vs_null() {
        let config = json!({ "edgemicro": { "port": null } });
        let root = Field::root(&config);

        let port = root.at(&["edgemicro", "port"]);
        assert_eq!(port, Field::Null);
        assert!(port.is_present());
        assert!(!port.is_defined());

        let missing = root.at(&["edgemicro", "redisHost"]);
        assert_eq!(missing, Field::Absent);
        assert!(!missing.is_present());
    }

    #[test]
    fn test_navigation_through_non_object() {
        let config = json!({ "edgemicro": "not-a-section" });
        let field = Field::root(&config).at(&["edgemicro", "port"]);
        assert_eq!(field, Field::Absent);
    }

    #[test]
    fn test_display() {
        let config = json!({ "a": "millenia", "b": 5, "c": 1.5, "d": true });
        let root = Field::root(&config);
        assert_eq!(root.get("a").to_string(), "millenia");
        assert_eq!(root.get("b").to_string(), "5");
        assert_eq!(root.get("c").to_string(), "1.5");
        assert_eq!(root.get("d").to_string(), "true");
        assert_eq!(root.get("e").to_string(), "undefined");
    }
}
