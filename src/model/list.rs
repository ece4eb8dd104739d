use crate::model::task::{Task, TaskId};

/// The ordered in-memory task collection.
///
/// Owns id allocation: new ids come from a counter that always stays above
/// every id in the list, so ids never collide however fast tasks are created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        TaskList {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Build a list from already-normalized tasks (ids must be unique)
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks
            .iter()
            .map(|t| t.id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        TaskList { tasks, next_id }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Mutable access to the backing order (used by sorting)
    pub fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Reserve the next id
    pub fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id.max(1));
        self.next_id = id.0.saturating_add(1);
        id
    }

    pub fn push(&mut self, task: Task) {
        if task.id.0 >= self.next_id {
            self.next_id = task.id.0.saturating_add(1);
        }
        self.tasks.push(task);
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove the task with this id, returning it
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }
}
