use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{AttendanceError, Result};
use crate::viewer::TextViewer;

/// Launches an external program on the log file. Keeps the handle of the
/// last launched process so repeated submissions replace the window instead
/// of piling up new ones.
pub struct ProcessViewer {
    program: String,
    args: Vec<String>,
    grace: Duration,
    child: Option<Child>,
    // Killed viewers that had not exited within the grace period.
    exiting: Vec<Child>,
}

impl ProcessViewer {
    pub fn platform_default(grace: Duration) -> Self {
        let (program, args): (&str, &[&str]) = if cfg!(target_os = "windows") {
            ("notepad.exe", &[])
        } else if cfg!(target_os = "macos") {
            ("open", &["-a", "TextEdit"])
        } else {
            ("xdg-open", &[])
        };
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            grace,
            child: None,
            exiting: Vec::new(),
        }
    }

    /// The log path is appended after the parsed words.
    pub fn from_command_line(line: &str, grace: Duration) -> Result<Self> {
        let mut words = shell_words::split(line)
            .map_err(|e| AttendanceError::InvalidArg(format!("viewer command: {e}")))?;
        if words.is_empty() {
            return Err(AttendanceError::InvalidArg(
                "viewer command must not be empty".to_string(),
            ));
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
            grace,
            child: None,
            exiting: Vec::new(),
        })
    }

    pub fn command_line(&self) -> String {
        shell_words::join(
            std::iter::once(self.program.as_str()).chain(self.args.iter().map(|s| s.as_str())),
        )
    }

    /// Returns true when a still-running viewer had to be signalled.
    pub fn terminate_previous(&mut self) -> Result<bool> {
        self.reap_exiting();
        let Some(mut child) = self.child.take() else {
            return Ok(false);
        };
        if child.try_wait()?.is_some() {
            return Ok(false);
        }

        debug!(pid = child.id(), "terminating previous viewer");
        if let Err(e) = child.kill() {
            return Err(AttendanceError::Viewer(format!(
                "failed to terminate previous viewer (pid {}): {e}",
                child.id()
            )));
        }
        std::thread::sleep(self.grace);
        if !matches!(child.try_wait(), Ok(Some(_))) {
            self.exiting.push(child);
        }
        Ok(true)
    }

    fn reap_exiting(&mut self) {
        self.exiting
            .retain_mut(|child| !matches!(child.try_wait(), Ok(Some(_)) | Err(_)));
    }
}

impl TextViewer for ProcessViewer {
    fn open(&mut self, path: &Path) -> Result<()> {
        if let Err(err) = self.terminate_previous() {
            warn!(error = %err, "previous viewer left running");
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.arg(path);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| {
            AttendanceError::Viewer(format!("failed to launch `{}`: {e}", self.command_line()))
        })?;
        debug!(pid = child.id(), command = %self.command_line(), "viewer launched");
        self.child = Some(child);
        Ok(())
    }
}
