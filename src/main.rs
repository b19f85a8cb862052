use clap::Parser;
use renfiles::cli::{Cli, run_cli};
use renfiles::logging;
use renfiles::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run_cli(&cli) {
        Ok(summary) if summary.has_failures() => {
            OutputFormatter::warning("Some files could not be renamed. Please review errors above.");
            ExitCode::from(2)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
