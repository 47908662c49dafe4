use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::recorder::DEFAULT_LOG_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "attendance-log",
    version,
    about = "Record attendance entries to an append-only text log"
)]
pub struct Cli {
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    #[arg(long, default_value = "text")]
    pub output: String,

    // Only the negative toggle is exposed; the viewer is on by default.
    #[arg(long = "no-viewer", default_value_t = true, action = clap::ArgAction::SetFalse)]
    pub viewer: bool,

    /// Command line used instead of the platform viewer; the log path is appended.
    #[arg(long = "viewer")]
    pub viewer_command: Option<String>,

    /// How long to wait after terminating the previous viewer.
    #[arg(long, default_value = "100ms")]
    pub viewer_grace: humantime::Duration,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive attendance form on stdin/stdout.
    Form,
    /// Record a single entry.
    Submit {
        #[arg(long, allow_hyphen_values = true)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        course: String,
    },
    /// Print every recorded entry.
    List,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if self.viewer_grace.as_ref().is_zero() {
            return Err("viewer-grace must be > 0".to_string());
        }

        if !matches!(self.output.as_str(), "text" | "json") {
            return Err(format!("Unknown output format: {}", self.output));
        }

        Ok(())
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Form)
    }
}
