use clap::Parser;
use osort::cli::Cli;
use osort::observability::{init_tracing, install_panic_hook};
use std::process::ExitCode;

/// Exit status for errors that stop the run before any file is sorted.
const FATAL_EXIT: u8 = 2;

fn main() -> ExitCode {
    install_panic_hook();
    let cli = Cli::parse();

    let ansi = cli.color.with_env().should_use_color();
    init_tracing(cli.verbose, cli.quiet, ansi);

    match osort::commands::run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(FATAL_EXIT)),
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::from(FATAL_EXIT)
        }
    }
}
