use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AttendanceError, Result};
use crate::record::{self, AttendanceRecord};
use crate::viewer::TextViewer;

pub const DEFAULT_LOG_FILE: &str = "AllAttendanceRecords.txt";

const MISSING_FIELD: &str = "missing required field";

#[derive(Debug, Serialize)]
pub struct Submission {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub log_path: PathBuf,
}

/// Validates submissions, appends them to the log and shows the log in the
/// viewer it owns.
pub struct AttendanceRecorder<V: TextViewer> {
    log_path: PathBuf,
    viewer: V,
}

impl<V: TextViewer> AttendanceRecorder<V> {
    pub fn new(log_path: impl Into<PathBuf>, viewer: V) -> Self {
        Self {
            log_path: log_path.into(),
            viewer,
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Emptiness is judged on the trimmed text; the stored fields keep the
    /// text exactly as given.
    pub fn submit(&self, name: &str, course: &str) -> Result<Submission> {
        if !record::has_required_fields(name, course) {
            return Err(AttendanceError::Validation(MISSING_FIELD.to_string()));
        }

        let record = AttendanceRecord::new(name, course, Local::now());
        append_line(&self.log_path, &record.to_line())
            .map_err(|e| AttendanceError::Storage(e.to_string()))?;

        let log_path = resolve(&self.log_path);
        info!(
            path = %log_path.display(),
            signature = %record.signature,
            "attendance recorded"
        );
        Ok(Submission { record, log_path })
    }

    /// Best-effort; failures only reach the operator log.
    pub fn open_in_viewer(&mut self, path: &Path) {
        if let Err(err) = self.viewer.open(path) {
            warn!(path = %path.display(), error = %err, "could not open log in viewer");
        }
    }

    /// Reads every record back from the log. A missing log is empty.
    pub fn history(&self) -> Result<Vec<AttendanceRecord>> {
        let contents = match fs::read_to_string(&self.log_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(idx, line)| {
                AttendanceRecord::parse_line(line).map_err(|reason| AttendanceError::Parse {
                    line: idx + 1,
                    reason,
                })
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn viewer(&self) -> &V {
        &self.viewer
    }
}

// One write_all on an append handle keeps each line in one write(2).
fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.sync_data()
}

// Shown to the user and handed to the viewer, so no `\\?\` verbatim prefix.
fn resolve(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
