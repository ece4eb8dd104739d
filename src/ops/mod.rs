pub mod query;
pub mod sort;
pub mod task_ops;
