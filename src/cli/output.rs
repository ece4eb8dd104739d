use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::io::state::ViewState;
use crate::model::task::{Task, TaskId, format_timestamp};
use crate::ops::query::{self, Summary};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: TaskId,
    pub text: String,
    pub deadline: String,
    pub completed: bool,
    #[serde(rename = "completedAt")]
    pub completed_at: String,
    pub overdue: bool,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodJson>,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct PeriodJson {
    pub from: String,
    pub to: String,
}

#[derive(Serialize)]
pub struct StatsJson {
    #[serde(flatten)]
    pub summary: Summary,
    pub visible: usize,
}

pub fn task_to_json(task: &Task, today: NaiveDate) -> TaskJson {
    TaskJson {
        id: task.id,
        text: task.text.clone(),
        deadline: task.deadline.clone(),
        completed: task.completed,
        completed_at: task
            .completed_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
        overdue: query::is_overdue(task, today),
    }
}

pub fn list_to_json(tasks: &[&Task], view: &ViewState, today: NaiveDate) -> TaskListJson {
    TaskListJson {
        filter: view.filter.to_string(),
        period: view.period.is_active().then(|| PeriodJson {
            from: view.period.from.clone(),
            to: view.period.to.clone(),
        }),
        tasks: tasks.iter().map(|t| task_to_json(t, today)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Render a deadline for display. Malformed values, and formats a date
/// cannot fill (bad specifiers, times, offsets), show the stored string.
pub fn format_deadline(deadline: &str, date_format: &str) -> String {
    if deadline.is_empty() {
        return "no deadline".to_string();
    }
    let Some(date) = crate::model::task::parse_date_only(deadline) else {
        return deadline.to_string();
    };
    let mut out = String::new();
    match write!(out, "{}", date.format(date_format)) {
        Ok(()) => out,
        Err(_) => deadline.to_string(),
    }
}

/// One-line summary: `[x] 3 Pay rent  (due 01.01.2024)`, with `!` marking
/// overdue tasks
pub fn format_task_line(task: &Task, today: NaiveDate, date_format: &str) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let flag = if query::is_overdue(task, today) { "!" } else { " " };
    let due = if task.has_deadline() {
        format!("due {}", format_deadline(&task.deadline, date_format))
    } else {
        "no deadline".to_string()
    };
    format!("[{}]{}{} {}  ({})", check, flag, task.id, task.text, due)
}

pub fn format_task_detail(task: &Task, today: NaiveDate, date_format: &str) -> Vec<String> {
    let mut lines = vec![format_task_line(task, today, date_format)];
    lines.push(format!(
        "deadline: {}",
        format_deadline(&task.deadline, date_format)
    ));
    if task.has_deadline() && task.deadline_date().is_none() {
        lines.push("  (not a valid date, ignored for overdue and period checks)".to_string());
    }
    lines.push(format!(
        "status: {}",
        if task.completed { "completed" } else { "active" }
    ));
    if let Some(ts) = &task.completed_at {
        lines.push(format!("completed at: {}", format_timestamp(ts)));
    }
    if query::is_overdue(task, today) {
        lines.push("overdue".to_string());
    }
    lines
}

/// Header describing the active view, e.g. `active tasks, due 2024-01-01..2024-01-31`
pub fn format_view_header(view: &ViewState) -> String {
    let mut header = format!("{} tasks", view.filter);
    if view.period.is_active() {
        let from = if view.period.from.is_empty() {
            "*"
        } else {
            view.period.from.as_str()
        };
        let to = if view.period.to.is_empty() {
            "*"
        } else {
            view.period.to.as_str()
        };
        header.push_str(&format!(", due {}..{}", from, to));
    }
    header
}

pub fn format_listing(
    tasks: &[&Task],
    view: &ViewState,
    today: NaiveDate,
    date_format: &str,
) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", format_view_header(view))];
    if tasks.is_empty() {
        lines.push("(nothing to show)".to_string());
    }
    for task in tasks {
        lines.push(format_task_line(task, today, date_format));
    }
    lines
}

pub fn format_summary(summary: &Summary) -> String {
    format!(
        "{} tasks: {} active, {} completed, {} overdue, {} without deadline",
        summary.total, summary.active, summary.completed, summary.overdue, summary.no_deadline
    )
}
