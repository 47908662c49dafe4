use std::io::{self, Write};

use serde::Serialize;

use crate::error::{AttendanceError, Result};
use crate::record::AttendanceRecord;
use crate::recorder::Submission;

pub fn write_submission(
    out: &mut impl Write,
    format: &str,
    submission: &Submission,
) -> Result<()> {
    match format {
        "text" => write_submission_text(out, submission)?,
        "json" => {
            serde_json::to_writer_pretty(&mut *out, submission)?;
            writeln!(out)?;
        }
        other => return Err(unknown_format(other)),
    }
    out.flush()?;
    Ok(())
}

pub fn print_records(format: &str, records: &[AttendanceRecord]) -> Result<()> {
    match format {
        "text" => write_records_text(&mut io::stdout(), records),
        "json" => print_json(&records),
        other => Err(unknown_format(other)),
    }
}

fn write_submission_text(out: &mut impl Write, submission: &Submission) -> Result<()> {
    let record = &submission.record;
    writeln!(out, "Attendance recorded successfully!")?;
    writeln!(out, "Name: {}", record.name)?;
    writeln!(out, "Course: {}", record.course)?;
    writeln!(out, "Time: {}", record.timestamp)?;
    writeln!(out, "E-Signature: {}", record.signature)?;
    writeln!(out)?;
    writeln!(out, "Record saved to: {}", submission.log_path.display())?;
    Ok(())
}

fn write_records_text(out: &mut impl Write, records: &[AttendanceRecord]) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "No attendance recorded yet.")?;
        return Ok(());
    }
    for (idx, record) in records.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} ({}) at {}  [{}]",
            idx + 1,
            record.name,
            record.course,
            record.timestamp,
            record.signature
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Total: {}", records.len())?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

fn unknown_format(format: &str) -> AttendanceError {
    AttendanceError::InvalidArg(format!("Unknown output format: {format}"))
}
