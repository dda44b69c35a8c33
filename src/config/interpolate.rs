//! Variable interpolation for task steps
//!
//! Replaces `${var.<name>}` placeholders, where `<name>` is made of letters,
//! digits, `-` and `_`.

use crate::config::variable::Variable;
use crate::error::{InterpolationError, InterpolationResult};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static VARIABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{var\.([a-zA-Z0-9_-]+)\}").expect("variable pattern is a valid regex")
});

/// Names of the variables referenced by `step`, in order of first appearance
pub fn referenced_variables(step: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in VARIABLE_PATTERN.captures_iter(step) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Interpolate every placeholder of `step`
///
/// Every referenced variable must be defined; it resolves through
/// [`Variable::get`] with the matching override. Substituted values are
/// inserted verbatim and never re-scanned.
pub fn interpolate(
    step: &str,
    variables: &IndexMap<String, Variable>,
    overrides: &HashMap<String, String>,
    dry_run: bool,
) -> InterpolationResult<String> {
    let mut values: HashMap<&str, String> = HashMap::new();
    for name in referenced_variables(step) {
        let variable = variables
            .get(name)
            .ok_or_else(|| InterpolationError::UndefinedVariable(name.to_string()))?;
        let value = variable.get(overrides.get(name).map(String::as_str), dry_run)?;
        values.insert(name, value);
    }

    if values.is_empty() {
        return Ok(step.to_string());
    }

    let mut result = String::with_capacity(step.len());
    let mut last = 0;
    for caps in VARIABLE_PATTERN.captures_iter(step) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some(value) = values.get(name.as_str()) {
            result.push_str(&step[last..whole.start()]);
            result.push_str(value);
            last = whole.end();
        }
    }
    result.push_str(&step[last..]);

    Ok(result)
}

/// Interpolate a list of steps
pub fn interpolate_list(
    steps: &[String],
    variables: &IndexMap<String, Variable>,
    overrides: &HashMap<String, String>,
    dry_run: bool,
) -> InterpolationResult<Vec<String>> {
    steps
        .iter()
        .map(|step| interpolate(step, variables, overrides, dry_run))
        .collect()
}
