use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::{Task, TaskId};
use crate::model::view::{DeadlinePeriod, StatusFilter};

/// Counts over a task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
    pub no_deadline: usize,
}

/// Whether a task passes the status filter
pub fn matches_status(task: &Task, status: StatusFilter) -> bool {
    match status {
        StatusFilter::All => true,
        StatusFilter::Active => !task.completed,
        StatusFilter::Completed => task.completed,
    }
}

/// Whether a task's deadline falls inside the period (both ends inclusive).
///
/// With no bound set everything passes. Otherwise tasks without a usable
/// deadline are outside the period.
pub fn in_period(task: &Task, period: &DeadlinePeriod) -> bool {
    if !period.is_active() {
        return true;
    }
    let Some(deadline) = task.deadline_date() else {
        return false;
    };
    if let Some(from) = period.from_date()
        && deadline < from
    {
        return false;
    }
    if let Some(to) = period.to_date()
        && deadline > to
    {
        return false;
    }
    true
}

/// The subset of tasks to display, in list order
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    status: StatusFilter,
    period: &DeadlinePeriod,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| matches_status(t, status) && in_period(t, period))
        .collect()
}

/// An incomplete task whose deadline is strictly before `today`
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    if task.completed {
        return false;
    }
    match task.deadline_date() {
        Some(deadline) => deadline < today,
        None => false,
    }
}

pub fn overdue_ids(tasks: &[Task], today: NaiveDate) -> Vec<TaskId> {
    tasks
        .iter()
        .filter(|t| is_overdue(t, today))
        .map(|t| t.id)
        .collect()
}

pub fn summarize(tasks: &[Task], today: NaiveDate) -> Summary {
    let mut summary = Summary {
        total: tasks.len(),
        ..Default::default()
    };
    for task in tasks {
        if task.completed {
            summary.completed += 1;
        } else {
            summary.active += 1;
        }
        if is_overdue(task, today) {
            summary.overdue += 1;
        }
        if task.deadline_date().is_none() {
            summary.no_deadline += 1;
        }
    }
    summary
}
