use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use colored::Colorize;

use kit::app::{self, Context};
use kit::cli::Cli;
use kit::config::EnvConfig;
use kit::interaction::TerminalInteraction;
use kit::{interrupt, logging, KitError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let kit_error = error.downcast_ref::<KitError>();
            if matches!(kit_error, Some(KitError::UserCancelled)) {
                eprintln!("\n{}", "Program terminated".yellow());
            } else {
                eprintln!("{} {error:#}", "Error:".red().bold());
            }
            ExitCode::from(kit_error.map_or(1, KitError::exit_code))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let interrupted = interrupt::install()?;
    let ctx = Context::new(EnvConfig::from_env(), interrupted)?;
    let mut ui = TerminalInteraction::new().context("failed to open the terminal")?;
    app::run(cli.action(), &ctx, &mut ui)?;
    Ok(())
}
