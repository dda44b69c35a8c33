//! Common test utilities

#![allow(dead_code)]

use project_tasks::runner::Executor;
use std::fs;
use std::io;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a pyproject.toml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    create_named_config("pyproject.toml", content)
}

/// Create a temporary directory with a configuration file of the given name
pub fn create_named_config(file_name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(file_name);
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test config in a temporary directory with an empty subdirectory
pub fn create_test_config_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, config_path) = create_test_config(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, config_path, sub_dir)
}

/// Executor recording commands instead of running them
#[derive(Debug, Default)]
pub struct FakeExecutor {
    pub commands: Vec<String>,
    failures: Vec<(String, i32)>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit with `code`
    pub fn failing(mut self, command: &str, code: i32) -> Self {
        self.failures.push((command.to_string(), code));
        self
    }
}

impl Executor for FakeExecutor {
    fn run(&mut self, command: &str) -> io::Result<i32> {
        self.commands.push(command.to_string());
        let code = self
            .failures
            .iter()
            .find(|(failing, _)| failing == command)
            .map_or(0, |(_, code)| *code);
        Ok(code)
    }
}
