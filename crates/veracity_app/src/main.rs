//! `veracity` command-line front end.
mod cli;
mod input;
mod render;
mod run;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use veracity_logging::veracity_error;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    veracity_logging::initialize(cli.log, cli.log_level(), cli.log_file.as_deref());

    match run::execute(&cli).await {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            veracity_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
