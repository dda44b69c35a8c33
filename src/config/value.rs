//! Format-independent document tree
//!
//! Both TOML and YAML sources are decoded into [`Value`] once, so task and
//! variable definitions are parsed by a single set of shape rules.

use indexmap::IndexMap;

/// A decoded configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Datetime(String),
    Array(Vec<Value>),
    Table(IndexMap<String, Value>),
}

impl Value {
    /// Name of the value's type, as shown in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Datetime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Integer(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Boolean(b),
            toml::Value::Datetime(d) => Value::Datetime(d.to_string()),
            toml::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(table) => Value::Table(
                table
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Boolean(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => Value::String(s),
            Yaml::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Yaml::Mapping(mapping) => Value::Table(
                mapping
                    .into_iter()
                    .map(|(key, value)| (yaml_key(key), Value::from(value)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// YAML allows non-string keys; render them so they show up in key errors
fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Null => "null".to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
