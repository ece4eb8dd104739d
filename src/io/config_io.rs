use std::fs;
use std::path::Path;

use crate::io::project_io::ProjectError;
use crate::model::config::Config;

/// Default config.toml written by `tk init`
pub const CONFIG_TEMPLATE: &str = r##"# tickoff configuration

[sort]
# Direction used by `tk sort` without --asc/--desc: "asc" or "desc".
# Tasks without a deadline always sort last.
direction = "desc"

[display]
# chrono format for deadlines in list output
date_format = "%d.%m.%Y"

[watch]
# Seconds between overdue re-checks in `tk watch`
interval_secs = 60
"##;

/// Read config.toml from the data directory. A missing file yields defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ProjectError> {
    let config_path = data_dir.join("config.toml");
    let text = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ProjectError::ReadError {
                path: config_path,
                source: e,
            });
        }
    };
    Ok(toml::from_str(&text)?)
}
