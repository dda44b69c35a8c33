//! Configuration parsing and resolution
//!
//! This module decodes `pyproject.toml` or `tasks.yml` files, validates task
//! and variable definitions, and resolves them into a [`Config`].

pub mod graph;
pub mod interpolate;
pub mod parse;
pub mod project;
pub mod schema;
pub mod types;
pub mod value;
pub mod variable;

// Re-export main types
pub use parse::*;
pub use project::Config;
pub use types::*;
pub use value::Value;
pub use variable::Variable;
