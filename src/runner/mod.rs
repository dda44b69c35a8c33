//! Task execution engine
//!
//! This module runs resolved tasks through a shell and reports what it does.

pub mod executor;
pub mod output;
pub mod service;

// Re-export main types
pub use executor::*;
pub use output::*;
pub use service::*;
