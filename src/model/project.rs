use std::path::PathBuf;

use crate::model::config::Config;

/// A discovered task directory and its configuration
#[derive(Debug, Clone)]
pub struct Project {
    /// The `.tickoff/` directory itself
    pub data_dir: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }
}
