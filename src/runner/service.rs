//! Task execution service
//!
//! Runs requested tasks one after another, stopping at the first failure.

use crate::config::Config;
use crate::error::{ExecutionError, Result};
use crate::runner::executor::Executor;
use crate::runner::output::Output;
use std::collections::HashMap;

/// What the user asked to run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Task names, run in this order
    pub tasks: Vec<String>,

    /// Variable overrides from the command line
    pub variables: HashMap<String, String>,

    /// Print commands instead of running them
    pub dry_run: bool,
}

impl Request {
    pub fn new<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Request {
            tasks: tasks.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Runs tasks of a [`Config`] through an [`Executor`]
pub struct Service<'a, E, O> {
    config: &'a Config,
    executor: E,
    output: O,
}

impl<'a, E: Executor, O: Output> Service<'a, E, O> {
    pub fn new(config: &'a Config, executor: E, output: O) -> Self {
        Service {
            config,
            executor,
            output,
        }
    }

    /// Execute every task of the request in order
    ///
    /// Unknown task names are all reported before anything runs. A command
    /// exiting with a non-zero code stops the whole request.
    pub fn execute(&mut self, request: &Request) -> Result<()> {
        let missing: Vec<String> = request
            .tasks
            .iter()
            .filter(|name| !self.config.contains_task(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ExecutionError::UnknownTask(missing).into());
        }

        for name in &request.tasks {
            let task = self
                .config
                .get_task(name, &request.variables, request.dry_run)?;
            self.output.write_debug(&format!("Running task: {}", name))?;

            for command in task.steps() {
                if request.dry_run {
                    self.output.write(command)?;
                    continue;
                }

                self.output.write_debug(&format!("[RUN] {}", command))?;
                let code = self
                    .executor
                    .run(command)
                    .map_err(|source| ExecutionError::Spawn {
                        task: name.clone(),
                        source,
                    })?;
                if code != 0 {
                    return Err(ExecutionError::CommandFailed {
                        task: name.clone(),
                        code,
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
