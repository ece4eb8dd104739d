use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tempfile::NamedTempFile;

/// Log size above which old entries are trimmed on the next append (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Entries older than this many days are dropped by a default prune.
pub const PRUNE_AGE_DAYS: i64 = 30;

const FILE_HEADER: &str = "\
<!-- tickoff recovery log: task data that could not be read or saved.
     Deleted tasks are copied here too.
     View with: tk recovery
     Prune old entries: tk recovery prune
     Safe to delete. -->

---
";

/// Why an entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// Stored data that could not be decoded
    Load,
    /// A save that did not reach disk
    Write,
    /// A task removed by the user
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Load => write!(f, "load"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "load" => Some(RecoveryCategory::Load),
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Render as a markdown block:
    ///
    /// ```text
    /// ## 2024-01-10T08:00:00Z [write] tasks not saved
    ///
    /// Target: tasks.json
    ///
    /// (fenced body)
    /// ---
    /// ```
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} [{}] {}\n\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.category,
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }

    /// JSON form for `tk recovery --json`
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }

    pub fn to_display_markdown(&self) -> String {
        self.to_markdown()
    }
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

/// Write `content` to `path` through a temp file in the same directory and a
/// rename, so readers never see a partial file.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Appending
// ---------------------------------------------------------------------------

/// Append an entry. Failures are reported through tracing and otherwise
/// ignored.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = append_entry(data_dir, &entry) {
        tracing::warn!(
            dir = %data_dir.display(),
            error = %e,
            "could not write to recovery log"
        );
    }
}

fn append_entry(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
        let content = std::fs::read_to_string(&path)?;
        atomic_write(&path, prune_entries_before(&content, &cutoff).as_bytes())?;
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read entries, most recent first. `limit` keeps the newest N.
pub fn read_recovery_entries(
    data_dir: &Path,
    limit: Option<usize>,
    since: Option<DateTime<Utc>>,
) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);
    if let Some(since) = since {
        entries.retain(|e| e.timestamp >= since);
    }
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }
    entries.reverse();
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(header) = line.strip_prefix("## ") else {
            continue;
        };
        let Some((timestamp, category, description)) = parse_entry_header(header) else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body_lines: Vec<&str> = Vec::new();
        let mut in_body = false;

        for line in lines.by_ref() {
            if in_body {
                if line == "```" {
                    in_body = false;
                } else {
                    body_lines.push(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_body = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body: body_lines.join("\n"),
        });
    }

    entries
}

/// Parse `<timestamp> [<category>] <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp, rest) = header.split_once(" [")?;
    let (category, description) = rest.split_once("] ")?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .ok()?
        .with_timezone(&Utc);
    let category = RecoveryCategory::parse_category(category)?;
    Some((timestamp, category, description.to_string()))
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Drop entries older than `before` (default: [`PRUNE_AGE_DAYS`]), or every
/// entry when `all` is set. Returns how many were removed.
pub fn prune_recovery(
    data_dir: &Path,
    before: Option<DateTime<Utc>>,
    all: bool,
) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }
    let content = std::fs::read_to_string(&path)?;
    let original = parse_entries(&content).len();

    if all {
        atomic_write(&path, FILE_HEADER.as_bytes())?;
        return Ok(original);
    }

    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));
    let trimmed = prune_entries_before(&content, &cutoff);
    let remaining = parse_entries(&trimmed).len();
    atomic_write(&path, trimmed.as_bytes())?;
    Ok(original - remaining)
}

/// Remove entries stamped before `cutoff`, keeping the file header.
fn prune_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let mut result = String::new();
    let mut current = String::new();
    let mut keep_current = false;
    let mut in_header = true;
    let mut in_body = false;

    for line in content.lines() {
        if in_header {
            result.push_str(line);
            result.push('\n');
            if line == "---" {
                in_header = false;
            }
            continue;
        }

        if in_body {
            in_body = line != "```";
        } else if line.starts_with("```") {
            in_body = true;
        } else if let Some(header) = line.strip_prefix("## ") {
            if keep_current {
                result.push_str(&current);
            }
            current.clear();
            keep_current = parse_entry_header(header).is_some_and(|(ts, _, _)| ts >= *cutoff);
        }
        current.push_str(line);
        current.push('\n');
    }
    if keep_current {
        result.push_str(&current);
    }

    result
}
