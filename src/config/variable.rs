//! Variable resolution
//!
//! A [`Variable`] holds its definition and computes its value on demand, so
//! environment variables and files are read fresh on every lookup.

use crate::config::types::VariableDefinition;
use crate::error::{InterpolationError, InterpolationResult};
use indexmap::IndexMap;
use std::env;
use std::fs;
use std::io;

/// A resolved variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    definition: VariableDefinition,
}

impl Variable {
    pub fn new(name: impl Into<String>, definition: VariableDefinition) -> Self {
        Variable {
            name: name.into(),
            definition,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_secret(&self) -> bool {
        self.definition.secret
    }

    /// Effective value of the variable
    ///
    /// Sources are tried in order: override, environment variable, file, default.
    pub fn value(&self, override_value: Option<&str>) -> InterpolationResult<String> {
        if let Some(value) = override_value {
            return Ok(value.to_string());
        }

        if let Some(name) = &self.definition.env {
            if let Some(value) = env::var_os(name) {
                return Ok(value.to_string_lossy().into_owned());
            }
        }

        if let Some(path) = &self.definition.file {
            match fs::read_to_string(path) {
                Ok(contents) => return Ok(contents),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(InterpolationError::ReadFile {
                        name: self.name.clone(),
                        path: path.clone(),
                        source,
                    })
                }
            }
        }

        self.definition
            .default
            .clone()
            .ok_or_else(|| InterpolationError::ValueNotDefined(self.name.clone()))
    }

    /// Value as shown to the user: secrets are masked in dry runs
    pub fn get(&self, override_value: Option<&str>, dry_run: bool) -> InterpolationResult<String> {
        let value = self.value(override_value)?;
        if dry_run && self.is_secret() {
            return Ok(mask(&value));
        }
        Ok(value)
    }
}

/// One `*` per character of `value`
pub fn mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

/// Resolve every variable definition, keeping definition order
pub fn resolve_variables(
    definitions: IndexMap<String, VariableDefinition>,
) -> IndexMap<String, Variable> {
    definitions
        .into_iter()
        .map(|(name, definition)| (name.clone(), Variable::new(name, definition)))
        .collect()
}
