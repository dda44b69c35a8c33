use project_tasks::cli;
use project_tasks::runner::Console;
use std::env;
use std::process;

fn main() {
    let mut console = Console::new();
    process::exit(cli::run(&mut console, env::args().skip(1)));
}
