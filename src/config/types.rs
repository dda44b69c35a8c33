//! Core configuration types
//!
//! Definitions are the typed form of the configuration file, before any
//! dependency or variable resolution. [`Task`] is the resolved form.

use std::path::PathBuf;

/// One step of a task definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Literal commands, run in order
    Command(Vec<String>),

    /// Name of another task whose commands are spliced in at this point
    Reference(String),
}

/// A task as written in the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDefinition {
    pub steps: Vec<Step>,
}

impl TaskDefinition {
    pub fn new(steps: Vec<Step>) -> Self {
        TaskDefinition { steps }
    }
}

/// A variable as written in the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableDefinition {
    /// Value used when nothing else provides one
    pub default: Option<String>,

    /// Environment variable to read from
    pub env: Option<String>,

    /// File whose contents are the value
    pub file: Option<PathBuf>,

    /// Whether the value is masked in dry runs
    pub secret: bool,
}

impl VariableDefinition {
    /// Definition with only a default value
    pub fn with_default(default: impl Into<String>) -> Self {
        VariableDefinition {
            default: Some(default.into()),
            ..Default::default()
        }
    }
}

/// A resolved task: commands with every dependency expanded in place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    steps: Vec<String>,
}

impl Task {
    pub fn new(steps: Vec<String>) -> Self {
        Task { steps }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }
}

impl<S: Into<String>> FromIterator<S> for Task {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Task::new(iter.into_iter().map(Into::into).collect())
    }
}
