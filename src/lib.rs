//! project-tasks - run tasks defined in pyproject.toml
//!
//! Tasks are shell commands, or references to other tasks, declared under
//! `[tool.project-tasks]` (or in a `tasks.yml` file). Variables in the form
//! `${var.<name>}` are substituted from command line overrides, environment
//! variables, files or defaults.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{Result, TasksError};

/// Current version of project-tasks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
