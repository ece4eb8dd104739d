use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::CONFIG_TEMPLATE;
use crate::io::project_io::{self, DATA_DIR};

pub fn cmd_init(args: InitArgs, cwd: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = cwd.join(DATA_DIR);

    if data_dir.is_dir() {
        if !args.force {
            return Err(format!(
                "task list already exists in {}/ (use --force to reset config.toml)",
                data_dir.display()
            )
            .into());
        }
        fs::write(data_dir.join("config.toml"), CONFIG_TEMPLATE)?;
        println!("Reset config in {}", data_dir.display());
        return Ok(());
    }

    // Nested lists are allowed, but say which one commands will now use
    if let Some(parent) = cwd.parent()
        && let Ok(parent_root) = project_io::discover_project(parent)
    {
        eprintln!(
            "Note: task list found at {}/",
            parent_root.join(DATA_DIR).display()
        );
        eprintln!("Creating a new one in ./{}/", DATA_DIR);
    }

    project_io::init_project(cwd, CONFIG_TEMPLATE)?;
    println!("Initialized task list in {}", data_dir.display());
    Ok(())
}
