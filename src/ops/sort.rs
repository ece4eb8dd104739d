use std::cmp::Ordering;

use crate::model::task::Task;
use crate::model::view::SortDirection;

/// Reorder tasks by deadline in place.
///
/// Stable: tasks with equal deadlines keep their relative order. Tasks with
/// no usable deadline always go last, whatever the direction.
pub fn sort_by_deadline(tasks: &mut [Task], direction: SortDirection) {
    tasks.sort_by(|a, b| compare_deadlines(a, b, direction));
}

fn compare_deadlines(a: &Task, b: &Task, direction: SortDirection) -> Ordering {
    match (a.deadline_date(), b.deadline_date()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(da), Some(db)) => match direction {
            SortDirection::Ascending => da.cmp(&db),
            SortDirection::Descending => db.cmp(&da),
        },
    }
}
