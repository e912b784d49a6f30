use std::io;
use std::process::ExitCode;

use clap::Parser;
use hexsession::logging::init_logging;
use hexsession::EngineConfig;
use hexsession_cli::{execute, render, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging("warn");

    let config = EngineConfig::from_env();
    let result = execute(&cli.command, config, &mut io::stdin().lock());

    let rendered = render(
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
        cli.json,
        &result,
    );
    match (result, rendered) {
        (Ok(_), Ok(())) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
