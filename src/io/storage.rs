//! Durable storage for the task list.
//!
//! The list lives in a single slot (a file in practice) as JSON. Current
//! writes use a versioned envelope:
//!
//! ```json
//! {"version": 2, "tasks": [{"id": 1, "text": "...", "deadline": "2024-01-10",
//!   "completed": false, "completedAt": ""}]}
//! ```
//!
//! A bare array of records is the version 1 layout and still loads. Reading
//! never fails: anything unusable yields an empty list and a log entry.
//! Writing never fails either: a write error is logged and the previous
//! contents of the slot stay as they were.

use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::task::{MAX_TASK_ID, Task, TaskId};

/// Format version written by [`save`]
pub const FORMAT_VERSION: u64 = 2;

/// A single read/write location for the serialized task list
pub trait StorageSlot {
    /// Current contents, `None` when nothing has been stored yet
    fn read(&self) -> io::Result<Option<String>>;
    /// Replace the contents. Must leave the old contents intact on error.
    fn write(&self, content: &str) -> io::Result<()>;
    /// Human-readable location, used in log messages
    fn describe(&self) -> String;
    /// Directory that holds the recovery log for this slot, if any
    fn recovery_dir(&self) -> Option<&Path> {
        None
    }
}

/// Slot backed by a file, replaced atomically on write
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSlot { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, content: &str) -> io::Result<()> {
        recovery::atomic_write(&self.path, content.as_bytes())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn recovery_dir(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// In-memory slot. `fail_writes` simulates a full or read-only store.
#[derive(Debug, Default)]
pub struct MemorySlot {
    content: RefCell<Option<String>>,
    pub fail_writes: bool,
}

impl MemorySlot {
    pub fn new() -> Self {
        MemorySlot::default()
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        MemorySlot {
            content: RefCell::new(Some(content.into())),
            fail_writes: false,
        }
    }

    pub fn content(&self) -> Option<String> {
        self.content.borrow().clone()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.content.borrow().clone())
    }

    fn write(&self, content: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::other("storage quota exceeded"));
        }
        *self.content.borrow_mut() = Some(content.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Error type for decoding a stored payload
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored payload is not a task array")]
    NotAnArray,
    #[error("unsupported storage format version {0}")]
    UnsupportedVersion(u64),
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u64,
    tasks: &'a [Task],
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load the task list from a slot, falling back to an empty list when the
/// slot is empty, unreadable or holds something other than a task array.
pub fn load(slot: &dyn StorageSlot) -> Vec<Task> {
    let raw = match slot.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(slot = %slot.describe(), "no stored tasks");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(slot = %slot.describe(), error = %e, "could not read stored tasks");
            return Vec::new();
        }
    };

    match decode(&raw) {
        Ok(tasks) => {
            tracing::debug!(slot = %slot.describe(), count = tasks.len(), "loaded tasks");
            tasks
        }
        Err(e) => {
            tracing::warn!(slot = %slot.describe(), error = %e, "stored tasks unreadable, starting empty");
            if let Some(dir) = slot.recovery_dir() {
                recovery::log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Load, "stored tasks unreadable")
                        .field("Source", slot.describe())
                        .field("Error", e.to_string())
                        .body(raw),
                );
            }
            Vec::new()
        }
    }
}

/// Persist the full list. Errors are logged, never returned.
pub fn save(slot: &dyn StorageSlot, tasks: &[Task]) {
    let content = encode(tasks);
    match slot.write(&content) {
        Ok(()) => {
            tracing::debug!(slot = %slot.describe(), count = tasks.len(), "saved tasks");
        }
        Err(e) => {
            tracing::warn!(slot = %slot.describe(), error = %e, "could not save tasks");
            if let Some(dir) = slot.recovery_dir() {
                recovery::log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Write, "tasks not saved")
                        .field("Target", slot.describe())
                        .field("Error", e.to_string())
                        .body(content),
                );
            }
        }
    }
}

/// Serialize the list in the current format
pub fn encode(tasks: &[Task]) -> String {
    let envelope = Envelope {
        version: FORMAT_VERSION,
        tasks,
    };
    // Task serialization has no failure modes (plain strings, numbers, bools)
    serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a stored payload into normalized tasks
pub fn decode(raw: &str) -> Result<Vec<Task>, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut map) => {
            let version = map.get("version").and_then(Value::as_u64).unwrap_or(0);
            if version == 0 {
                return Err(DecodeError::NotAnArray);
            }
            if version > FORMAT_VERSION {
                return Err(DecodeError::UnsupportedVersion(version));
            }
            match map.remove("tasks") {
                Some(Value::Array(records)) => records,
                _ => return Err(DecodeError::NotAnArray),
            }
        }
        _ => return Err(DecodeError::NotAnArray),
    };
    Ok(normalize_records(&records))
}

// ---------------------------------------------------------------------------
// Record normalization
// ---------------------------------------------------------------------------

/// Turn raw records into tasks, filling in defaults.
///
/// Non-object entries are skipped. Records whose id is missing, unusable or
/// already taken get a fresh id above every valid one, in record order.
fn normalize_records(records: &[Value]) -> Vec<Task> {
    let objects: Vec<&serde_json::Map<String, Value>> =
        records.iter().filter_map(Value::as_object).collect();

    let mut seen = HashSet::new();
    let ids: Vec<Option<u64>> = objects
        .iter()
        .map(|rec| rec.get("id").and_then(id_value).filter(|id| seen.insert(*id)))
        .collect();
    let mut next_fallback = seen.iter().max().copied().unwrap_or(0).saturating_add(1);

    objects
        .iter()
        .zip(ids)
        .map(|(rec, id)| {
            let id = id.unwrap_or_else(|| {
                let id = next_fallback;
                next_fallback = next_fallback.saturating_add(1);
                id
            });
            Task {
                id: TaskId(id),
                text: string_value(rec.get("text")),
                deadline: string_value(rec.get("deadline")),
                completed: rec.get("completed").is_some_and(truthy),
                completed_at: rec.get("completedAt").and_then(timestamp_value),
            }
        })
        .collect()
}

/// A positive integer id up to [`MAX_TASK_ID`], given as a JSON number or
/// numeric string
fn id_value(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f > 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (1..=MAX_TASK_ID).contains(&id).then_some(id)
}

fn string_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Loose boolean coercion for legacy records
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
