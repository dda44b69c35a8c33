//! Task dependency resolution
//!
//! Every task definition is flattened into a [`Task`]: references are replaced,
//! depth-first and in step order, by the commands of the task they name.

use crate::config::types::{Step, Task, TaskDefinition};
use crate::error::{ConfigError, ConfigResult, DefinitionError};
use indexmap::IndexMap;

/// Resolve every task of the graph
///
/// All tasks are resolved up front so that a broken definition is reported
/// before anything runs, even if it is never requested.
pub fn resolve_tasks(
    graph: &IndexMap<String, TaskDefinition>,
) -> ConfigResult<IndexMap<String, Task>> {
    graph
        .iter()
        .map(|(name, definition)| {
            resolve_task(graph, name, definition)
                .map(|task| (name.clone(), task))
                .map_err(|source| ConfigError::InvalidTask {
                    name: name.clone(),
                    source,
                })
        })
        .collect()
}

/// Resolve a single task of the graph
pub fn resolve_task(
    graph: &IndexMap<String, TaskDefinition>,
    name: &str,
    definition: &TaskDefinition,
) -> Result<Task, DefinitionError> {
    let mut commands = Vec::new();
    expand(graph, name, definition, &[], &mut commands)?;
    Ok(Task::new(commands))
}

/// Append the expanded commands of `name` to `out`
///
/// `parents` holds the chain of tasks being expanded above `name`.
fn expand<'a>(
    graph: &'a IndexMap<String, TaskDefinition>,
    name: &'a str,
    definition: &'a TaskDefinition,
    parents: &[&'a str],
    out: &mut Vec<String>,
) -> Result<(), DefinitionError> {
    let mut path = parents.to_vec();
    path.push(name);

    for step in &definition.steps {
        match step {
            Step::Command(commands) => out.extend(commands.iter().cloned()),
            Step::Reference(dependency) => {
                if path.contains(&dependency.as_str()) {
                    return Err(DefinitionError::CircularDependency {
                        from: name.to_string(),
                        to: dependency.clone(),
                    });
                }
                let dependency_definition = graph.get(dependency).ok_or_else(|| {
                    DefinitionError::UnknownReference {
                        name: dependency.clone(),
                        parent: name.to_string(),
                    }
                })?;
                expand(graph, dependency, dependency_definition, &path, out)?;
            }
        }
    }

    Ok(())
}
