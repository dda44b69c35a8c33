//! Error types for project-tasks

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for project-tasks operations
pub type Result<T> = std::result::Result<T, TasksError>;

/// Main error type for project-tasks
#[derive(Error, Debug)]
pub enum TasksError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TasksError {
    /// Process exit code for this error.
    ///
    /// A failing command propagates its own exit code, everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            TasksError::Execution(ExecutionError::CommandFailed { code, .. }) => *code,
            _ => 1,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("failed to read config file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("variable '{name}': {reason}")]
    InvalidVariable { name: String, reason: String },

    #[error("task '{name}': {source}")]
    InvalidTask {
        name: String,
        #[source]
        source: DefinitionError,
    },
}

/// Malformed configuration source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// File the content was read from, if any
    pub file: Option<PathBuf>,
    /// 1-based line of the failure
    pub line: usize,
    /// 1-based column of the failure
    pub column: usize,
    /// Decoder message, first letter lowercased
    pub reason: String,
}

impl DecodeError {
    /// `line:column` of the failure
    pub fn location(&self) -> String {
        format!("{}:{}", self.line, self.column)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}: {}", file.display(), self.location(), self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Structural errors in a single task definition, or in its dependency graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("wrong type '{0}': task must be a string, a table or an array of strings.")]
    WrongTaskType(String),

    #[error("task step cannot be empty.")]
    EmptyStep,

    #[error("wrong step type '{0}': step must be a string.")]
    WrongStepType(String),

    #[error("wrong type '{0}': cmd must be a string or an array.")]
    WrongCmdType(String),

    #[error("wrong type '{0}': cmd array items must be strings.")]
    WrongCmdItemType(String),

    #[error("wrong type '{0}': deps must be an array of strings.")]
    WrongDepsType(String),

    #[error("wrong type '{0}': deps array items must be strings.")]
    WrongDepItemType(String),

    #[error("wrong key '{0}': task can be defined as table with keys: ['cmd', 'deps'].")]
    WrongKey(String),

    #[error("task '{from}' and '{to}' introduce a circular dependency.")]
    CircularDependency { from: String, to: String },

    #[error("task '{name}' does not exist (used by '{parent}').")]
    UnknownReference { name: String, parent: String },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("{}", unknown_tasks_message(.0))]
    UnknownTask(Vec<String>),

    #[error("task {task} failed with exit code {code}")]
    CommandFailed { task: String, code: i32 },

    #[error("task {task} could not start command: {source}")]
    Spawn {
        task: String,
        #[source]
        source: io::Error,
    },
}

fn unknown_tasks_message(names: &[String]) -> String {
    match names {
        [name] => format!("task does not exist: '{}'", name),
        _ => {
            let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
            format!("tasks do not exist: {}", quoted.join(", "))
        }
    }
}

/// Variable resolution and interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("variable '{0}' is not defined.")]
    UndefinedVariable(String),

    #[error("variable '{0}': value is not defined.")]
    ValueNotDefined(String),

    #[error("variable '{name}': failed to read file '{path}': {source}")]
    ReadFile {
        name: String,
        path: PathBuf,
        source: io::Error,
    },
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;
