use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAME_TAG: &str = "Name: ";
const COURSE_TAG: &str = " Course/Year: ";
const TIME_TAG: &str = " Time In: ";
const SIGNATURE_TAG: &str = " E-Signature: ";

/// One attendance entry. Built once per submission and only ever persisted
/// as a single log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub name: String,
    pub course: String,
    pub timestamp: String,
    pub signature: String,
}

impl AttendanceRecord {
    pub fn new(name: &str, course: &str, at: DateTime<Local>) -> Self {
        Self {
            name: name.to_string(),
            course: course.to_string(),
            timestamp: format_timestamp(at),
            signature: new_signature(),
        }
    }

    /// Log line including the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{NAME_TAG}{}{COURSE_TAG}{}{TIME_TAG}{}{SIGNATURE_TAG}{}\n",
            self.name, self.course, self.timestamp, self.signature
        )
    }

    /// Parses a line without its newline. The signature and timestamp are
    /// split from the right; name and course split at the first course tag.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let rest = line
            .strip_prefix(NAME_TAG)
            .ok_or_else(|| "missing `Name:` prefix".to_string())?;
        let (rest, signature) = rest
            .rsplit_once(SIGNATURE_TAG)
            .ok_or_else(|| "missing `E-Signature:` field".to_string())?;
        let (rest, timestamp) = rest
            .rsplit_once(TIME_TAG)
            .ok_or_else(|| "missing `Time In:` field".to_string())?;
        let (name, course) = rest
            .split_once(COURSE_TAG)
            .ok_or_else(|| "missing `Course/Year:` field".to_string())?;

        chrono::NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| format!("bad timestamp {timestamp:?}: {e}"))?;

        Ok(Self {
            name: name.to_string(),
            course: course.to_string(),
            timestamp: timestamp.to_string(),
            signature: signature.to_string(),
        })
    }
}

pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn new_signature() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Both fields must carry something other than whitespace.
pub fn has_required_fields(name: &str, course: &str) -> bool {
    !name.trim().is_empty() && !course.trim().is_empty()
}
