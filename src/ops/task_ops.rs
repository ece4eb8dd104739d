use chrono::{SubsecRound, Utc};

use crate::model::list::TaskList;
use crate::model::task::{Task, TaskId};

/// Error type for task operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("task text cannot be empty")]
    EmptyText,
}

// ---------------------------------------------------------------------------
// Creation and removal
// ---------------------------------------------------------------------------

/// Append a new incomplete task. Text is trimmed; whitespace-only text is
/// rejected and the list is left untouched.
pub fn create_task(list: &mut TaskList, text: &str, deadline: &str) -> Result<TaskId, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyText);
    }
    let id = list.allocate_id();
    list.push(Task::new(id, text.to_string(), deadline.trim().to_string()));
    Ok(id)
}

/// Remove a task. Unknown ids are a no-op; returns the removed task.
pub fn delete_task(list: &mut TaskList, id: TaskId) -> Option<Task> {
    list.remove(id)
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Set the completion flag, stamping or clearing `completed_at` on a
/// transition. Returns whether anything changed.
pub fn set_completed(list: &mut TaskList, id: TaskId, value: bool) -> Result<bool, TaskError> {
    let task = list.find_mut(id).ok_or(TaskError::NotFound(id))?;
    if task.completed == value {
        return Ok(false);
    }
    task.completed = value;
    task.completed_at = if value {
        // Millisecond precision matches what the storage format can hold
        Some(Utc::now().trunc_subsecs(3))
    } else {
        None
    };
    Ok(true)
}

/// Flip the completion flag. Returns the new value.
pub fn toggle_completed(list: &mut TaskList, id: TaskId) -> Result<bool, TaskError> {
    let current = list.find(id).ok_or(TaskError::NotFound(id))?.completed;
    set_completed(list, id, !current)?;
    Ok(!current)
}

// ---------------------------------------------------------------------------
// In-place edits
// ---------------------------------------------------------------------------

/// Replace the text with the trimmed input. Empty input is discarded and the
/// original text kept; returns whether the text was replaced.
pub fn edit_text(list: &mut TaskList, id: TaskId, new_text: &str) -> Result<bool, TaskError> {
    let task = list.find_mut(id).ok_or(TaskError::NotFound(id))?;
    let trimmed = new_text.trim();
    if trimmed.is_empty() {
        return Ok(false);
    }
    task.text = trimmed.to_string();
    Ok(true)
}

/// Replace the deadline. An empty string clears it. No date validation.
pub fn edit_deadline(list: &mut TaskList, id: TaskId, new_deadline: &str) -> Result<(), TaskError> {
    let task = list.find_mut(id).ok_or(TaskError::NotFound(id))?;
    task.deadline = new_deadline.trim().to_string();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list() -> TaskList {
        let mut list = TaskList::new();
        create_task(&mut list, "Buy milk", "2024-01-10").unwrap();
        create_task(&mut list, "Call mom", "").unwrap();
        list
    }

    #[test]
    fn test_create_assigns_id_and_defaults() {
        let mut list = sample_list();
        let id = create_task(&mut list, "  Write tests  ", "2024-02-01").unwrap();
        let task = list.find(id).unwrap();
        assert_eq!(task.text, "Write tests");
        assert_eq!(task.deadline, "2024-02-01");
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert_eq!(list.tasks().last().unwrap().id, id);
    }

    #[test]
    fn test_create_whitespace_rejected() {
        let mut list = sample_list();
        let before = list.clone();
        assert_eq!(create_task(&mut list, "   \t ", ""), Err(TaskError::EmptyText));
        assert_eq!(create_task(&mut list, "", "2024-01-01"), Err(TaskError::EmptyText));
        assert_eq!(list, before);
    }

    #[test]
    fn test_create_ids_unique_in_tight_loop() {
        let mut list = TaskList::new();
        let ids: Vec<TaskId> = (0..100)
            .map(|i| create_task(&mut list, &format!("t{}", i), "").unwrap())
            .collect();
        let mut dedup = ids.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), ids.len());
    }

    #[test]
    fn test_delete_task() {
        let mut list = sample_list();
        let id = list.tasks()[0].id;
        assert!(delete_task(&mut list, id).is_some());
        assert_eq!(list.len(), 1);
        assert!(list.find(id).is_none());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut list = sample_list();
        assert!(delete_task(&mut list, TaskId(999)).is_none());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_set_completed_stamps_and_clears() {
        let mut list = sample_list();
        let id = list.tasks()[0].id;

        assert_eq!(set_completed(&mut list, id, true), Ok(true));
        let task = list.find(id).unwrap();
        assert!(task.completed);
        assert!(task.completed_at.is_some());

        assert_eq!(set_completed(&mut list, id, false), Ok(true));
        let task = list.find(id).unwrap();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_set_completed_same_value_keeps_stamp() {
        let mut list = sample_list();
        let id = list.tasks()[0].id;
        set_completed(&mut list, id, true).unwrap();
        let stamp = list.find(id).unwrap().completed_at;
        assert_eq!(set_completed(&mut list, id, true), Ok(false));
        assert_eq!(list.find(id).unwrap().completed_at, stamp);
    }

    #[test]
    fn test_set_completed_unknown() {
        let mut list = sample_list();
        assert_eq!(
            set_completed(&mut list, TaskId(42), true),
            Err(TaskError::NotFound(TaskId(42)))
        );
    }

    #[test]
    fn test_toggle_completed() {
        let mut list = sample_list();
        let id = list.tasks()[1].id;
        assert_eq!(toggle_completed(&mut list, id), Ok(true));
        assert_eq!(toggle_completed(&mut list, id), Ok(false));
        assert!(list.find(id).unwrap().completed_at.is_none());
    }

    #[test]
    fn test_edit_text() {
        let mut list = sample_list();
        let id = list.tasks()[0].id;
        assert_eq!(edit_text(&mut list, id, " Buy oat milk "), Ok(true));
        assert_eq!(list.find(id).unwrap().text, "Buy oat milk");
    }

    #[test]
    fn test_edit_text_whitespace_keeps_original() {
        let mut list = sample_list();
        let id = list.tasks()[0].id;
        assert_eq!(edit_text(&mut list, id, "   "), Ok(false));
        assert_eq!(list.find(id).unwrap().text, "Buy milk");
    }

    #[test]
    fn test_edit_deadline_set_and_clear() {
        let mut list = sample_list();
        let id = list.tasks()[1].id;
        edit_deadline(&mut list, id, "2024-03-01").unwrap();
        assert_eq!(list.find(id).unwrap().deadline, "2024-03-01");
        edit_deadline(&mut list, id, "").unwrap();
        assert_eq!(list.find(id).unwrap().deadline, "");
    }

    #[test]
    fn test_edit_deadline_unknown() {
        let mut list = sample_list();
        assert!(edit_deadline(&mut list, TaskId(7), "2024-03-01").is_err());
    }
}
