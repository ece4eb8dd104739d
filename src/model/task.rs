use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Months, NaiveDate, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Largest id a stored record may carry (2^53 - 1, exact in any JSON reader).
/// Larger ids are reassigned when the list loads.
pub const MAX_TASK_ID: u64 = (1 << 53) - 1;

/// Identity of a task within one task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| format!("invalid task id '{}'", s))
    }
}

/// A single to-do item.
///
/// Field names in the serialized form are fixed by the on-disk format
/// (`id`, `text`, `deadline`, `completed`, `completedAt`). Absent optional
/// values are written as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    /// Raw `YYYY-MM-DD` string as entered; empty when there is no deadline
    pub deadline: String,
    pub completed: bool,
    #[serde(rename = "completedAt", serialize_with = "serialize_completed_at")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: TaskId, text: String, deadline: String) -> Self {
        Task {
            id,
            text,
            deadline,
            completed: false,
            completed_at: None,
        }
    }

    /// The deadline as a calendar date, or `None` when absent or malformed
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        parse_date_only(&self.deadline)
    }

    pub fn has_deadline(&self) -> bool {
        !self.deadline.is_empty()
    }
}

/// Parse `YYYY-MM-DD` into a calendar date.
///
/// Requires exactly three `-` separated numeric parts, none of them zero.
/// Out-of-range months and days roll over into the following months, so
/// `2023-02-30` is 2023-03-02 and `2024-13-01` is 2025-01-01. Everything
/// else, and anything past chrono's date range, is `None`.
pub fn parse_date_only(iso: &str) -> Option<NaiveDate> {
    if iso.is_empty() {
        return None;
    }
    let parts: Vec<&str> = iso.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let year: i32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let day: u32 = parts[2].trim().parse().ok()?;
    if year == 0 || month == 0 || day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, 1, 1)?
        .checked_add_months(Months::new(month - 1))?
        .checked_add_days(Days::new(u64::from(day - 1)))
}

/// Timestamp format used for `completedAt` (millisecond precision, `Z` suffix)
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_completed_at<S>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => s.serialize_str(&format_timestamp(ts)),
        None => s.serialize_str(""),
    }
}
