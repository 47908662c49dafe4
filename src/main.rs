mod cli;
mod error;
mod form;
mod output;
mod record;
mod recorder;
mod viewer;

use std::io;

use crate::cli::{Cli, Command};
use crate::error::AttendanceError;
use crate::recorder::AttendanceRecorder;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    if let Err(err) = real_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn real_main() -> Result<(), AttendanceError> {
    let cli = Cli::parse();
    cli.validate().map_err(AttendanceError::InvalidArg)?;

    let viewer = viewer::select(
        cli.viewer,
        cli.viewer_command.as_deref(),
        cli.viewer_grace.into(),
    )?;
    let mut recorder = AttendanceRecorder::new(&cli.log_file, viewer);

    match cli.command() {
        Command::Form => form::run(&mut recorder, io::stdin().lock(), io::stdout()),
        Command::Submit { name, course } => {
            form::submit_once(&mut recorder, &name, &course, &cli.output, &mut io::stdout())?;
            Ok(())
        }
        Command::List => {
            let records = recorder.history()?;
            output::print_records(&cli.output, &records)
        }
    }
}
