//! Command execution
//!
//! This module runs expanded task commands through a shell.

use crate::config::Config;
use std::io;
use std::process::{Command as StdCommand, ExitStatus, Stdio};

/// Runs a single command line and reports its exit code
pub trait Executor {
    fn run(&mut self, command: &str) -> io::Result<i32>;
}

/// Executor passing each command to an interpreter (e.g., `sh -c <command>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellExecutor {
    interpreter: Vec<String>,
}

impl ShellExecutor {
    pub fn new(interpreter: Vec<String>) -> Self {
        ShellExecutor { interpreter }
    }

    /// Executor using the configured interpreter, or the platform shell
    pub fn from_config(config: &Config) -> Self {
        match config.interpreter() {
            Some(interpreter) => ShellExecutor::new(interpreter.to_vec()),
            None => ShellExecutor::default(),
        }
    }

    pub fn interpreter(&self) -> &[String] {
        &self.interpreter
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        let interpreter: &[&str] = if cfg!(windows) {
            &["powershell.exe", "-NoProfile", "-Command"]
        } else {
            &["sh", "-c"]
        };
        ShellExecutor::new(interpreter.iter().map(|s| s.to_string()).collect())
    }
}

impl Executor for ShellExecutor {
    fn run(&mut self, command: &str) -> io::Result<i32> {
        let (program, args) = self.interpreter.split_first().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "interpreter cannot be empty")
        })?;

        let status = StdCommand::new(program)
            .args(args)
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        Ok(exit_code(status))
    }
}

/// Exit code of a finished process; a signal `n` maps to `128 + n`
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
