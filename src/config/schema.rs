//! Configuration schema
//!
//! Turns decoded [`Value`]s into task and variable definitions, rejecting any
//! shape the runner does not understand.

use crate::config::types::{Step, TaskDefinition, VariableDefinition};
use crate::config::value::Value;
use crate::error::{ConfigError, ConfigResult, DefinitionError};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Keys accepted in a variable table
const VARIABLE_KEYS: &[&str] = &["default", "env", "file", "secret"];

/// Parse every task definition, keeping definition order
pub fn parse_task_definitions(
    raw: &IndexMap<String, Value>,
) -> ConfigResult<IndexMap<String, TaskDefinition>> {
    raw.iter()
        .map(|(name, value)| {
            parse_task_definition(value)
                .map(|definition| (name.clone(), definition))
                .map_err(|source| ConfigError::InvalidTask {
                    name: name.clone(),
                    source,
                })
        })
        .collect()
}

/// Parse a single task definition
///
/// Accepted shapes:
/// - `"cmd"`: one command
/// - `["cmd1", "cmd2"]`: a group of commands
/// - `{ deps = ["other"], cmd = "cmd" }`: references and commands, in key order
pub fn parse_task_definition(value: &Value) -> Result<TaskDefinition, DefinitionError> {
    match value {
        Value::String(command) => Ok(TaskDefinition::new(vec![parse_command_string(command)?])),
        Value::Array(items) => {
            let commands = parse_command_array(items, DefinitionError::WrongStepType)?;
            Ok(TaskDefinition::new(vec![commands]))
        }
        Value::Table(table) => parse_task_table(table),
        other => Err(DefinitionError::WrongTaskType(other.type_name().to_string())),
    }
}

fn parse_task_table(table: &IndexMap<String, Value>) -> Result<TaskDefinition, DefinitionError> {
    let mut steps = Vec::new();

    for (key, value) in table {
        match key.as_str() {
            "cmd" => {
                let step = match value {
                    Value::String(command) => parse_command_string(command)?,
                    Value::Array(items) => {
                        parse_command_array(items, DefinitionError::WrongCmdItemType)?
                    }
                    other => {
                        return Err(DefinitionError::WrongCmdType(other.type_name().to_string()))
                    }
                };
                steps.push(step);
            }
            "deps" => {
                let Value::Array(deps) = value else {
                    return Err(DefinitionError::WrongDepsType(value.type_name().to_string()));
                };
                for dep in deps {
                    let name = dep.as_str().ok_or_else(|| {
                        DefinitionError::WrongDepItemType(dep.type_name().to_string())
                    })?;
                    steps.push(Step::Reference(name.to_string()));
                }
            }
            other => return Err(DefinitionError::WrongKey(other.to_string())),
        }
    }

    Ok(TaskDefinition::new(steps))
}

fn parse_command_string(command: &str) -> Result<Step, DefinitionError> {
    if command.is_empty() {
        return Err(DefinitionError::EmptyStep);
    }
    Ok(Step::Command(vec![command.to_string()]))
}

/// Parse an array of command strings; `wrong_item` builds the error for non-string items
fn parse_command_array(
    items: &[Value],
    wrong_item: fn(String) -> DefinitionError,
) -> Result<Step, DefinitionError> {
    if items.is_empty() {
        return Err(DefinitionError::EmptyStep);
    }

    let mut commands = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(command) if command.is_empty() => return Err(DefinitionError::EmptyStep),
            Value::String(command) => commands.push(command.clone()),
            other => return Err(wrong_item(other.type_name().to_string())),
        }
    }
    Ok(Step::Command(commands))
}

/// Parse every variable definition, keeping definition order
pub fn parse_variable_definitions(
    raw: &IndexMap<String, Value>,
) -> ConfigResult<IndexMap<String, VariableDefinition>> {
    raw.iter()
        .map(|(name, value)| Ok((name.clone(), parse_variable_definition(name, value)?)))
        .collect()
}

/// Parse a single variable definition
///
/// A plain string is shorthand for a table with only `default`.
pub fn parse_variable_definition(name: &str, value: &Value) -> ConfigResult<VariableDefinition> {
    let invalid = |reason: String| ConfigError::InvalidVariable {
        name: name.to_string(),
        reason,
    };

    let table = match value {
        Value::String(default) => return Ok(VariableDefinition::with_default(default.clone())),
        Value::Table(table) => table,
        other => {
            return Err(invalid(format!(
                "wrong type '{}': variable must be a string or a table.",
                other.type_name()
            )))
        }
    };

    let mut definition = VariableDefinition::default();
    for (key, value) in table {
        let expect_string = || {
            value.as_str().map(str::to_string).ok_or_else(|| {
                invalid(format!(
                    "wrong type '{}': '{}' must be a string.",
                    value.type_name(),
                    key
                ))
            })
        };

        match key.as_str() {
            "default" => definition.default = Some(expect_string()?),
            "env" => definition.env = Some(expect_string()?),
            "file" => definition.file = Some(PathBuf::from(expect_string()?)),
            "secret" => match value {
                Value::Boolean(secret) => definition.secret = *secret,
                other => {
                    return Err(invalid(format!(
                        "wrong type '{}': 'secret' must be a boolean.",
                        other.type_name()
                    )))
                }
            },
            other => {
                return Err(invalid(format!(
                    "wrong key '{}': variable can be defined as table with keys: {:?}.",
                    other, VARIABLE_KEYS
                )))
            }
        }
    }

    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: Vec<(&str, Value)>) -> Value {
        Value::Table(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    fn strings(items: &[&str]) -> Value {
        Value::Array(items.iter().map(|s| Value::from(*s)).collect())
    }

    #[test]
    fn test_string_task() {
        let definition = parse_task_definition(&Value::from("cargo test")).unwrap();
        assert_eq!(
            definition.steps,
            vec![Step::Command(vec!["cargo test".to_string()])]
        );
    }

    #[test]
    fn test_array_task_is_one_group() {
        let definition = parse_task_definition(&strings(&["a", "b"])).unwrap();
        assert_eq!(
            definition.steps,
            vec![Step::Command(vec!["a".to_string(), "b".to_string()])]
        );
    }

    #[test]
    fn test_table_task_follows_key_order() {
        let value = table(vec![
            ("cmd", Value::from("first")),
            ("deps", strings(&["a", "b"])),
        ]);
        let definition = parse_task_definition(&value).unwrap();
        assert_eq!(
            definition.steps,
            vec![
                Step::Command(vec!["first".to_string()]),
                Step::Reference("a".to_string()),
                Step::Reference("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_steps_rejected() {
        assert_eq!(
            parse_task_definition(&Value::from("")),
            Err(DefinitionError::EmptyStep)
        );
        assert_eq!(
            parse_task_definition(&strings(&[""])),
            Err(DefinitionError::EmptyStep)
        );
        assert_eq!(
            parse_task_definition(&Value::Array(vec![])),
            Err(DefinitionError::EmptyStep)
        );
        assert_eq!(
            parse_task_definition(&table(vec![("cmd", strings(&[""]))])),
            Err(DefinitionError::EmptyStep)
        );
    }

    #[test]
    fn test_wrong_shapes() {
        assert_eq!(
            parse_task_definition(&Value::Integer(12)),
            Err(DefinitionError::WrongTaskType("integer".to_string()))
        );
        assert_eq!(
            parse_task_definition(&Value::Array(vec![Value::Integer(12)])),
            Err(DefinitionError::WrongStepType("integer".to_string()))
        );
        assert_eq!(
            parse_task_definition(&table(vec![("cmd", Value::Integer(12))])),
            Err(DefinitionError::WrongCmdType("integer".to_string()))
        );
        assert_eq!(
            parse_task_definition(&table(vec![("cmd", Value::Array(vec![Value::Boolean(true)]))])),
            Err(DefinitionError::WrongCmdItemType("boolean".to_string()))
        );
        assert_eq!(
            parse_task_definition(&table(vec![("deps", Value::Integer(12))])),
            Err(DefinitionError::WrongDepsType("integer".to_string()))
        );
        assert_eq!(
            parse_task_definition(&table(vec![("deps", Value::Array(vec![Value::Integer(12)]))])),
            Err(DefinitionError::WrongDepItemType("integer".to_string()))
        );
        assert_eq!(
            parse_task_definition(&table(vec![("invalid-key", Value::from("unused"))])),
            Err(DefinitionError::WrongKey("invalid-key".to_string()))
        );
    }

    #[test]
    fn test_task_errors_carry_task_name() {
        let mut raw = IndexMap::new();
        raw.insert("test".to_string(), Value::Integer(12));
        let err = parse_task_definitions(&raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "task 'test': wrong type 'integer': task must be a string, a table or an array of strings."
        );
    }

    #[test]
    fn test_variable_shorthand() {
        let definition = parse_variable_definition("foo", &Value::from("bar")).unwrap();
        assert_eq!(definition, VariableDefinition::with_default("bar"));
    }

    #[test]
    fn test_variable_table() {
        let value = table(vec![
            ("default", Value::from("d")),
            ("env", Value::from("FOO")),
            ("file", Value::from(".secrets/foo")),
            ("secret", Value::Boolean(true)),
        ]);
        let definition = parse_variable_definition("foo", &value).unwrap();
        assert_eq!(definition.default.as_deref(), Some("d"));
        assert_eq!(definition.env.as_deref(), Some("FOO"));
        assert_eq!(definition.file, Some(PathBuf::from(".secrets/foo")));
        assert!(definition.secret);
    }

    #[test]
    fn test_variable_wrong_type() {
        let err = parse_variable_definition("test", &Value::Integer(12)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "variable 'test': wrong type 'integer': variable must be a string or a table."
        );
    }

    #[test]
    fn test_variable_wrong_key() {
        let value = table(vec![("invalid-key", Value::from("unused"))]);
        let err = parse_variable_definition("test", &value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "variable 'test': wrong key 'invalid-key': variable can be defined as table with keys: [\"default\", \"env\", \"file\", \"secret\"]."
        );
    }

    #[test]
    fn test_variable_wrong_value_types() {
        let value = table(vec![("secret", Value::from("yes"))]);
        assert!(matches!(
            parse_variable_definition("test", &value),
            Err(ConfigError::InvalidVariable { .. })
        ));

        let value = table(vec![("env", Value::Integer(1))]);
        let err = parse_variable_definition("test", &value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "variable 'test': wrong type 'integer': 'env' must be a string."
        );
    }
}
