//! Output sinks for task runs
//!
//! Commands print to the inherited stdio directly; an [`Output`] only carries
//! what the runner itself has to say (dry-run lines, listings, diagnostics).

use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    #[default]
    Normal = 0,
    Verbose = 1,
}

/// Destination of the runner's own messages
pub trait Output {
    /// Write a line to standard output
    fn write(&mut self, line: &str) -> io::Result<()>;

    /// Write a line to standard error
    fn write_error(&mut self, line: &str) -> io::Result<()>;

    /// Write a diagnostic line, shown only in verbose mode
    fn write_debug(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }

    /// Change which diagnostics are shown
    fn set_verbosity(&mut self, _verbosity: Verbosity) {}
}

impl<O: Output + ?Sized> Output for &mut O {
    fn write(&mut self, line: &str) -> io::Result<()> {
        (**self).write(line)
    }

    fn write_error(&mut self, line: &str) -> io::Result<()> {
        (**self).write_error(line)
    }

    fn write_debug(&mut self, line: &str) -> io::Result<()> {
        (**self).write_debug(line)
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        (**self).set_verbosity(verbosity)
    }
}

/// Output to the process stdout and stderr
#[derive(Debug, Clone)]
pub struct Console {
    verbosity: Verbosity,
    color: bool,
}

impl Console {
    /// Console coloring errors only when stderr is a terminal
    pub fn new() -> Self {
        Console {
            verbosity: Verbosity::Normal,
            color: io::stderr().is_terminal(),
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for Console {
    fn write(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{}", line)
    }

    fn write_error(&mut self, line: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        if self.color {
            // colored checks NO_COLOR itself
            writeln!(stderr, "{}", line.red())
        } else {
            writeln!(stderr, "{}", line)
        }
    }

    fn write_debug(&mut self, line: &str) -> io::Result<()> {
        if self.verbosity >= Verbosity::Verbose {
            writeln!(io::stderr().lock(), "[DEBUG] {}", line)?;
        }
        Ok(())
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }
}

/// Output kept in memory, one entry per line
///
/// Debug lines are always recorded, whatever the verbosity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub debug: Vec<String>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Output for BufferedOutput {
    fn write(&mut self, line: &str) -> io::Result<()> {
        self.stdout.push(line.to_string());
        Ok(())
    }

    fn write_error(&mut self, line: &str) -> io::Result<()> {
        self.stderr.push(line.to_string());
        Ok(())
    }

    fn write_debug(&mut self, line: &str) -> io::Result<()> {
        self.debug.push(line.to_string());
        Ok(())
    }
}
