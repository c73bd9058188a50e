mod cli;
mod config;
mod convert;
mod diff_cmd;
mod evaluate_cmd;
mod inputs;
mod inspect_cmd;
mod logging;
mod stats_cmd;
mod sweep_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Evaluate(args) => evaluate_cmd::run(args),
        Command::Sweep(args) => sweep_cmd::run(args),
        Command::Stats(args) => stats_cmd::run(args),
        Command::Inspect(args) => inspect_cmd::run(args),
        Command::Diff(args) => diff_cmd::run(args),
    }
}
