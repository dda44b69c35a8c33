//! Resolved project configuration

use crate::config::graph::resolve_tasks;
use crate::config::interpolate::interpolate_list;
use crate::config::parse::Section;
use crate::config::schema::{parse_task_definitions, parse_variable_definitions};
use crate::config::types::Task;
use crate::config::value::Value;
use crate::config::variable::{resolve_variables, Variable};
use crate::error::{ConfigError, ConfigResult, ExecutionError, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Everything found in a configuration file, ready to run
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Config {
    tasks: IndexMap<String, Task>,
    variables: IndexMap<String, Variable>,
    interpreter: Option<Vec<String>>,
}

impl Config {
    pub fn new(tasks: IndexMap<String, Task>, variables: IndexMap<String, Variable>) -> Self {
        Config {
            tasks,
            variables,
            interpreter: None,
        }
    }

    /// Set the command prefix used to run steps
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    /// Parse and resolve a decoded section
    ///
    /// Tasks are checked first, then variables, then the interpreter.
    pub fn from_section(section: Section<Value>) -> ConfigResult<Self> {
        let task_definitions = parse_task_definitions(&section.tasks)?;
        let tasks = resolve_tasks(&task_definitions)?;

        let variable_definitions = parse_variable_definitions(&section.variables)?;
        let variables = resolve_variables(variable_definitions);

        let mut config = Config::new(tasks, variables);
        if let Some(interpreter) = section.interpreter {
            if interpreter.is_empty() {
                return Err(ConfigError::Invalid("interpreter cannot be empty".to_string()));
            }
            config = config.with_interpreter(interpreter);
        }

        Ok(config)
    }

    /// Task names, in definition order
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    pub fn contains_task(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn variables(&self) -> &IndexMap<String, Variable> {
        &self.variables
    }

    pub fn interpreter(&self) -> Option<&[String]> {
        self.interpreter.as_deref()
    }

    /// Get a task by name with every `${var.<name>}` replaced by its value
    ///
    /// `overrides` take precedence over every other variable source. With
    /// `dry_run`, secret variables are masked.
    pub fn get_task(
        &self,
        name: &str,
        overrides: &HashMap<String, String>,
        dry_run: bool,
    ) -> Result<Task> {
        let task = self
            .tasks
            .get(name)
            .ok_or_else(|| ExecutionError::UnknownTask(vec![name.to_string()]))?;

        let steps = interpolate_list(task.steps(), &self.variables, overrides, dry_run)?;
        Ok(Task::new(steps))
    }
}
