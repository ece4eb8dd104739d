use serde::{Deserialize, Serialize};

use crate::model::view::SortDirection;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sort: SortConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Direction used by `tk sort` when no flag is given
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// chrono format string for deadlines in human output
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            date_format: default_date_format(),
        }
    }
}

fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Seconds between overdue re-checks in `tk watch`
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}
