use std::io::{BufRead, Write};

use tracing::warn;

use crate::error::{AttendanceError, Result};
use crate::output;
use crate::recorder::{AttendanceRecorder, Submission};
use crate::viewer::TextViewer;

const MISSING_NOTICE: &str = "Please fill in Name and Course/Year fields!";
const UNREADABLE_NOTICE: &str = "Input line is not valid UTF-8; ignored.";

const HELP: &str = "\
Commands:
  name <text>     set Attendance Name
  course <text>   set Course/Year
  submit          record attendance
  clear           reset all fields
  show            print the form
  help            print this list
  quit, exit      leave";

/// Field state of the attendance form. Time in and e-signature are only
/// ever filled by a successful submit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Form {
    pub name: String,
    pub course: String,
    pub time_in: String,
    pub signature: String,
}

impl Form {
    pub fn clear(&mut self) {
        self.name.clear();
        self.course.clear();
        self.time_in.clear();
        self.signature.clear();
    }

    /// Submits the current fields and opens the viewer on success. Errors
    /// become the notice shown to the user.
    pub fn submit<V: TextViewer>(
        &mut self,
        recorder: &mut AttendanceRecorder<V>,
    ) -> std::result::Result<String, String> {
        match recorder.submit(&self.name, &self.course) {
            Ok(submission) => {
                self.time_in = submission.record.timestamp.clone();
                self.signature = submission.record.signature.clone();
                let message = format!(
                    "Attendance recorded successfully!\nName: {}\nCourse: {}\nTime: {}\n\nRecord saved to: {}",
                    self.name,
                    self.course,
                    self.time_in,
                    submission.log_path.display()
                );
                recorder.open_in_viewer(&submission.log_path);
                Ok(message)
            }
            Err(AttendanceError::Validation(_)) => Err(MISSING_NOTICE.to_string()),
            Err(AttendanceError::Storage(msg)) => Err(format!("Error saving to file: {msg}")),
            Err(err) => Err(err.to_string()),
        }
    }

    fn render(&self) -> String {
        format!(
            "Attendance Name: {}\nCourse/Year:     {}\nTime In:         {}\nE-Signature:     {}",
            self.name, self.course, self.time_in, self.signature
        )
    }
}

/// Runs the line-oriented form until `quit` or end of input.
pub fn run<V, R, W>(recorder: &mut AttendanceRecorder<V>, mut input: R, mut out: W) -> Result<()>
where
    V: TextViewer,
    R: BufRead,
    W: Write,
{
    let mut form = Form::default();
    writeln!(out, "Student Attendance System")?;
    writeln!(out, "Records are appended to {}", recorder.log_path().display())?;
    writeln!(out, "{HELP}")?;

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let Ok(line) = std::str::from_utf8(&buf) else {
            writeln!(out, "{UNREADABLE_NOTICE}")?;
            out.flush()?;
            continue;
        };
        let line = line.trim_end_matches(['\n', '\r']);
        let (command, value) = match line.trim_start().split_once(' ') {
            Some((command, value)) => (command, value),
            None => (line.trim(), ""),
        };

        match command {
            "name" => form.name = value.to_string(),
            "course" => form.course = value.to_string(),
            "submit" => match form.submit(recorder) {
                Ok(message) => writeln!(out, "{message}")?,
                Err(notice) => writeln!(out, "{notice}")?,
            },
            "clear" => form.clear(),
            "show" => writeln!(out, "{}", form.render())?,
            "help" => writeln!(out, "{HELP}")?,
            "quit" | "exit" => break,
            "" => {}
            other => writeln!(out, "Unknown command: {other} (try `help`)")?,
        }
        out.flush()?;
    }
    Ok(())
}

/// One-shot submission for the CLI. The viewer is opened before the result
/// is printed; once the line is appended, a failed print is only logged.
pub fn submit_once<V, W>(
    recorder: &mut AttendanceRecorder<V>,
    name: &str,
    course: &str,
    format: &str,
    out: &mut W,
) -> Result<Submission>
where
    V: TextViewer,
    W: Write,
{
    let submission = recorder.submit(name, course)?;
    recorder.open_in_viewer(&submission.log_path);
    if let Err(err) = output::write_submission(out, format, &submission) {
        warn!(error = %err, "attendance saved but the result could not be printed");
    }
    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::DEFAULT_LOG_FILE;
    use crate::recorder::tests::RecordingViewer;
    use std::fs;
    use std::io::{self, Cursor};

    use tempfile::TempDir;

    fn recorder(dir: &TempDir) -> AttendanceRecorder<RecordingViewer> {
        AttendanceRecorder::new(dir.path().join(DEFAULT_LOG_FILE), RecordingViewer::default())
    }

    fn drive(recorder: &mut AttendanceRecorder<RecordingViewer>, script: &str) -> String {
        let mut out = Vec::new();
        run(recorder, Cursor::new(script.to_string()), &mut out).expect("run");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn submit_fills_generated_fields_and_opens_viewer() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);
        let mut form = Form {
            name: "Ann Lee".into(),
            course: "BSIT-3".into(),
            ..Default::default()
        };

        let message = form.submit(&mut recorder).expect("submit");

        assert!(message.contains("Attendance recorded successfully!"));
        assert!(message.contains(DEFAULT_LOG_FILE));
        assert_eq!(form.time_in.len(), 19);
        assert_eq!(form.signature.len(), 36);
        assert_eq!(recorder.viewer().opened.len(), 1);
    }

    #[test]
    fn missing_field_shows_notice_without_viewer() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);
        let mut form = Form {
            name: "Ann Lee".into(),
            ..Default::default()
        };

        assert_eq!(form.submit(&mut recorder).unwrap_err(), MISSING_NOTICE);
        assert!(form.time_in.is_empty());
        assert!(recorder.viewer().opened.is_empty());
    }

    #[test]
    fn storage_failure_is_reported_and_viewer_skipped() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = AttendanceRecorder::new(
            dir.path().join("nope").join(DEFAULT_LOG_FILE),
            RecordingViewer::default(),
        );
        let mut form = Form {
            name: "Ann".into(),
            course: "BSIT-3".into(),
            ..Default::default()
        };

        let notice = form.submit(&mut recorder).unwrap_err();
        assert!(notice.starts_with("Error saving to file: "));
        assert!(form.signature.is_empty());
        assert!(recorder.viewer().opened.is_empty());
    }

    #[test]
    fn clear_resets_fields_but_not_log() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);
        let mut form = Form {
            name: "Ann".into(),
            course: "BSIT-3".into(),
            ..Default::default()
        };
        form.submit(&mut recorder).expect("submit");
        let before = fs::read(recorder.log_path()).expect("read");

        form.clear();

        assert_eq!(form, Form::default());
        assert_eq!(fs::read(recorder.log_path()).expect("read"), before);
    }

    #[test]
    fn scripted_session_records_two_entries() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);

        let output = drive(
            &mut recorder,
            "name Ann Lee\ncourse BSIT-3\nsubmit\nclear\nsubmit\nname Ben\ncourse BSCS-1\nsubmit\nquit\nsubmit\n",
        );

        assert_eq!(output.matches("Attendance recorded successfully!").count(), 2);
        assert_eq!(output.matches(MISSING_NOTICE).count(), 1);
        let history = recorder.history().expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].name, "Ann Lee");
        assert_eq!(history[1].course, "BSCS-1");
        assert_eq!(recorder.viewer().opened.len(), 2);
    }

    #[test]
    fn field_text_is_kept_verbatim() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);

        let output = drive(&mut recorder, "name   Ann \ncourse BSIT-3\nshow\nbogus\n");

        assert!(output.contains("Attendance Name:   Ann \n"));
        assert!(output.contains("Unknown command: bogus"));
        assert!(!recorder.log_path().exists());
    }

    #[test]
    fn undecodable_line_does_not_end_session() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);
        let mut out = Vec::new();

        run(
            &mut recorder,
            Cursor::new(b"name Jos\xe9\ncourse BSIT-3\nname Ann\nsubmit\n".to_vec()),
            &mut out,
        )
        .expect("run");

        let output = String::from_utf8(out).expect("utf8");
        assert!(output.contains(UNREADABLE_NOTICE));
        assert!(output.contains("Attendance recorded successfully!"));
        let history = recorder.history().expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "Ann");
    }

    #[test]
    fn help_lists_exit_alias() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);

        let output = drive(&mut recorder, "exit\nname Ann\ncourse BSIT-3\nsubmit\n");

        assert!(output.contains("quit, exit"));
        assert!(!recorder.log_path().exists());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn one_shot_submit_survives_closed_output() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);

        let submission = submit_once(&mut recorder, "Ann", "BSIT-3", "json", &mut ClosedPipe)
            .expect("saved despite closed output");

        assert_eq!(recorder.viewer().opened, vec![submission.log_path.clone()]);
        assert_eq!(recorder.history().expect("history").len(), 1);
    }

    #[test]
    fn one_shot_submit_prints_after_viewer() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);
        let mut out = Vec::new();

        submit_once(&mut recorder, "Ann", "BSIT-3", "text", &mut out).expect("submit");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("Attendance recorded successfully!\nName: Ann\n"));
        assert_eq!(recorder.viewer().opened.len(), 1);
    }

    #[test]
    fn one_shot_validation_error_skips_viewer_and_output() {
        let dir = TempDir::new().expect("tempdir");
        let mut recorder = recorder(&dir);
        let mut out = Vec::new();

        let err = submit_once(&mut recorder, " ", "BSIT-3", "text", &mut out).unwrap_err();

        assert!(matches!(err, AttendanceError::Validation(_)));
        assert!(out.is_empty());
        assert!(recorder.viewer().opened.is_empty());
    }
}
