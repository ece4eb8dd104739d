use std::fs;
use std::path::{Path, PathBuf};

use crate::io::config_io;
use crate::model::project::Project;

/// Name of the data directory that marks a task list root
pub const DATA_DIR: &str = ".tickoff";

/// Error type for project I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("no task list found: run `tk init` to create one")]
    NotAProject,
    #[error("task list already exists in {0}")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for a directory containing
/// `.tickoff/config.toml`.
pub fn discover_project(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join(DATA_DIR);
        if data_dir.is_dir() && data_dir.join("config.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ProjectError::NotAProject);
        }
    }
}

/// Load the project rooted at `root`
pub fn load_project(root: &Path) -> Result<Project, ProjectError> {
    let data_dir = root.join(DATA_DIR);
    if !data_dir.is_dir() {
        return Err(ProjectError::NotAProject);
    }
    let config = config_io::read_config(&data_dir)?;
    Ok(Project {
        data_dir,
        config,
    })
}

/// Create `.tickoff/` with the given config text. Fails if it already exists.
pub fn init_project(root: &Path, config_text: &str) -> Result<Project, ProjectError> {
    let data_dir = root.join(DATA_DIR);
    if data_dir.is_dir() {
        return Err(ProjectError::AlreadyExists(data_dir));
    }
    fs::create_dir_all(&data_dir)?;
    fs::write(data_dir.join("config.toml"), config_text)?;
    load_project(root)
}
