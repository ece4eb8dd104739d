//! Application state for one task list.
//!
//! [`Session`] owns the task list, the active view (status filter and deadline
//! period) and the storage slot. Every task mutation goes through it so the
//! list is saved after each change, and subscribers hear about every change.

use chrono::NaiveDate;

use crate::io::state::ViewState;
use crate::io::storage::{self, StorageSlot};
use crate::model::list::TaskList;
use crate::model::task::{Task, TaskId};
use crate::model::view::{DeadlinePeriod, SortDirection, StatusFilter};
use crate::ops::query::{self, Summary};
use crate::ops::sort;
use crate::ops::task_ops::{self, TaskError};

/// A state change, delivered to subscribers after it has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added(TaskId),
    Removed(TaskId),
    CompletionChanged { id: TaskId, completed: bool },
    TextEdited(TaskId),
    DeadlineEdited(TaskId),
    Sorted(SortDirection),
    FilterChanged(StatusFilter),
    PeriodChanged(DeadlinePeriod),
}

type Listener = Box<dyn FnMut(&Change)>;

pub struct Session {
    slot: Box<dyn StorageSlot>,
    list: TaskList,
    view: ViewState,
    listeners: Vec<Listener>,
}

impl Session {
    /// Load the list from `slot` and start with the given view
    pub fn open(slot: Box<dyn StorageSlot>, view: ViewState) -> Self {
        let list = TaskList::from_tasks(storage::load(slot.as_ref()));
        Session {
            slot,
            list,
            view,
            listeners: Vec::new(),
        }
    }

    /// Register a change listener
    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.list.find(id)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Tasks passing the active status filter and period, in list order
    pub fn visible(&self) -> Vec<&Task> {
        query::visible_tasks(self.list.tasks(), self.view.filter, &self.view.period)
    }

    pub fn is_overdue(&self, task: &Task, today: NaiveDate) -> bool {
        query::is_overdue(task, today)
    }

    pub fn summary(&self, today: NaiveDate) -> Summary {
        query::summarize(self.list.tasks(), today)
    }

    // -----------------------------------------------------------------------
    // Task mutations (persisted)
    // -----------------------------------------------------------------------

    pub fn add(&mut self, text: &str, deadline: &str) -> Result<TaskId, TaskError> {
        let id = task_ops::create_task(&mut self.list, text, deadline)?;
        self.commit(Change::Added(id));
        Ok(id)
    }

    /// Delete a task. Returns the removed task, `None` if the id was unknown.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let removed = task_ops::delete_task(&mut self.list, id);
        match removed {
            Some(_) => self.commit(Change::Removed(id)),
            None => self.persist(),
        }
        removed
    }

    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<bool, TaskError> {
        let changed = task_ops::set_completed(&mut self.list, id, completed)?;
        if changed {
            self.commit(Change::CompletionChanged { id, completed });
        }
        Ok(changed)
    }

    /// Flip completion. Returns the new value.
    pub fn toggle(&mut self, id: TaskId) -> Result<bool, TaskError> {
        let completed = task_ops::toggle_completed(&mut self.list, id)?;
        self.commit(Change::CompletionChanged { id, completed });
        Ok(completed)
    }

    /// Replace task text. Blank input leaves the task alone and returns false.
    pub fn edit_text(&mut self, id: TaskId, text: &str) -> Result<bool, TaskError> {
        let changed = task_ops::edit_text(&mut self.list, id, text)?;
        if changed {
            self.commit(Change::TextEdited(id));
        }
        Ok(changed)
    }

    pub fn edit_deadline(&mut self, id: TaskId, deadline: &str) -> Result<(), TaskError> {
        task_ops::edit_deadline(&mut self.list, id, deadline)?;
        self.commit(Change::DeadlineEdited(id));
        Ok(())
    }

    /// Reorder the whole list by deadline, regardless of the active filter
    pub fn sort(&mut self, direction: SortDirection) {
        sort::sort_by_deadline(self.list.tasks_mut(), direction);
        self.commit(Change::Sorted(direction));
    }

    // -----------------------------------------------------------------------
    // View changes (not written to the task slot)
    // -----------------------------------------------------------------------

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.view.filter = filter;
        self.notify(&Change::FilterChanged(filter));
    }

    pub fn set_period(&mut self, period: DeadlinePeriod) {
        self.view.period = period.clone();
        self.notify(&Change::PeriodChanged(period));
    }

    pub fn reset_period(&mut self) {
        self.set_period(DeadlinePeriod::default());
    }

    fn commit(&mut self, change: Change) {
        self.persist();
        self.notify(&change);
    }

    fn persist(&self) {
        storage::save(self.slot.as_ref(), self.list.tasks());
    }

    fn notify(&mut self, change: &Change) {
        tracing::debug!(?change, "session change");
        for listener in &mut self.listeners {
            listener(change);
        }
    }
}
