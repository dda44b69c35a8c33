//! Main CLI application

use crate::config::{parse_config_auto, parse_config_file, Config};
use crate::error::TasksError;
use crate::runner::{Output, Request, Service, ShellExecutor, Verbosity};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Prefix of variable override arguments
const VAR_PREFIX: &str = "--var.";

const USAGE: &str = "task [--help] [--list] [--file FILE] [--dry-run] [--verbose] \
[--completions SHELL] [--var.<NAME> VALUE] [task_name ...]";

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Configuration file given with `--file`
    pub file: Option<PathBuf>,
    /// Print task names instead of running anything
    pub list: bool,
    pub verbosity: Verbosity,
    pub request: Request,
}

/// Outcome of argument parsing that ends the program early
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// Help, version or completion text, printed to stdout
    Message(String),
    /// Usage error, printed to stderr with exit code 1
    Usage(String),
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("task")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run a single or several tasks defined in pyproject.toml")
        .override_usage(USAGE)
        .after_help("Variables:\n  --var.<NAME> <VALUE>  Set variable with value")
        .arg(
            Arg::new("task_name")
                .help("Task to run")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Show task steps instead of executing them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(clap::value_parser!(Shell))
                .help("Print a shell completion script")
                .exclusive(true),
        )
}

/// Variable overrides split off the command line
#[derive(Debug, Default, PartialEq, Eq)]
struct SplitArgs {
    /// Arguments left for clap
    rest: Vec<String>,
    variables: HashMap<String, String>,
    unrecognized: Vec<String>,
}

/// Extract `--var.<name> <value>` and `--var.<name>=<value>` before clap parsing
///
/// A `--var.<name>` followed by an option (anything starting with `-`), or
/// left without a value at the end, is unrecognized. A following `--var.`
/// argument is unrecognized too; any other option is still parsed.
/// Everything after `--` is kept as is.
fn split_variable_args(args: Vec<String>) -> SplitArgs {
    let mut split = SplitArgs::default();
    let mut pending: Option<String> = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg.starts_with('-') {
            if let Some(name) = pending.take() {
                split.unrecognized.push(format!("{}{}", VAR_PREFIX, name));
                if arg.starts_with(VAR_PREFIX) {
                    split.unrecognized.push(arg);
                    continue;
                }
            }
        }

        if arg == "--" {
            split.rest.push(arg);
            split.rest.extend(args.by_ref());
            break;
        }

        if let Some(variable) = arg.strip_prefix(VAR_PREFIX) {
            match variable.split_once('=') {
                Some((name, value)) => {
                    split.variables.insert(name.to_string(), value.to_string());
                }
                None => pending = Some(variable.to_string()),
            }
            continue;
        }

        match pending.take() {
            Some(name) => {
                split.variables.insert(name, arg);
            }
            None => split.rest.push(arg),
        }
    }

    if let Some(name) = pending {
        split.unrecognized.push(format!("{}{}", VAR_PREFIX, name));
    }

    split
}

fn usage_error(message: impl AsRef<str>) -> Exit {
    Exit::Usage(format!("usage: {}\ntask: error: {}", USAGE, message.as_ref()))
}

/// First line of a clap error, without its `error: ` prefix
fn clap_message(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

/// Parse command line arguments, program name excluded
pub fn parse_args<I, S>(args: I) -> Result<Invocation, Exit>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let split = split_variable_args(args.into_iter().map(Into::into).collect());
    if !split.unrecognized.is_empty() {
        return Err(usage_error(format!(
            "unrecognized arguments: {}",
            split.unrecognized.join(" ")
        )));
    }

    let mut command = build_command();
    let matches = command
        .try_get_matches_from_mut(std::iter::once("task".to_string()).chain(split.rest))
        .map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                Exit::Message(e.to_string().trim_end().to_string())
            }
            _ => usage_error(clap_message(&e)),
        })?;

    if let Some(shell) = matches.get_one::<Shell>("completions") {
        return Err(Exit::Message(completions(*shell, &mut command)));
    }

    let invocation = invocation_from(&matches, split.variables);

    if invocation.list {
        if invocation.request.dry_run
            || !invocation.request.tasks.is_empty()
            || !invocation.request.variables.is_empty()
        {
            return Err(usage_error(
                "--list option cannot be used together with tasks and variables arguments or --dry-run option",
            ));
        }
    } else if invocation.request.tasks.is_empty() {
        return Err(usage_error("at least one task name is required"));
    }

    Ok(invocation)
}

fn invocation_from(matches: &ArgMatches, variables: HashMap<String, String>) -> Invocation {
    let tasks = matches
        .get_many::<String>("task_name")
        .map(|names| names.cloned().collect())
        .unwrap_or_default();

    let verbosity = if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    Invocation {
        file: matches.get_one::<PathBuf>("file").cloned(),
        list: matches.get_flag("list"),
        verbosity,
        request: Request {
            tasks,
            variables,
            dry_run: matches.get_flag("dry-run"),
        },
    }
}

/// Shell completion script for `task`
fn completions(shell: Shell, command: &mut Command) -> String {
    let mut script = Vec::new();
    clap_complete::generate(shell, command, "task", &mut script);
    String::from_utf8_lossy(&script).trim_end().to_string()
}

fn load_config(file: Option<&PathBuf>) -> Result<Config, TasksError> {
    let config = match file {
        Some(path) => parse_config_file(path)?,
        None => parse_config_auto()?.0,
    };
    Ok(config)
}

fn execute(output: &mut impl Output, invocation: &Invocation) -> Result<(), TasksError> {
    let config = load_config(invocation.file.as_ref())?;

    if invocation.list {
        for name in config.task_names() {
            output.write(name)?;
        }
        return Ok(());
    }

    let executor = ShellExecutor::from_config(&config);
    let mut service = Service::new(&config, executor, &mut *output);
    service.execute(&invocation.request)
}

/// Run the CLI application with the given arguments, program name excluded
///
/// Everything is written to `output`; the returned value is the process exit
/// code.
pub fn run<I, S>(output: &mut impl Output, args: I) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let invocation = match parse_args(args) {
        Ok(invocation) => invocation,
        Err(Exit::Message(message)) => return report(output.write(&message), 0),
        Err(Exit::Usage(message)) => return report(output.write_error(&message), 1),
    };

    output.set_verbosity(invocation.verbosity);

    match execute(output, &invocation) {
        Ok(()) => 0,
        Err(e) => report(output.write_error(&format!("task: error: {}", e)), e.exit_code()),
    }
}

/// Exit code, unless the output itself could not be written
fn report(written: io::Result<()>, code: i32) -> i32 {
    match written {
        Ok(()) => code,
        Err(_) if code != 0 => code,
        Err(_) => 1,
    }
}
