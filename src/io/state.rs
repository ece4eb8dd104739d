use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::view::{DeadlinePeriod, StatusFilter};

/// Persisted view state (written to .state.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Active status filter
    #[serde(default)]
    pub filter: StatusFilter,
    /// Active deadline period; both bounds empty when none is applied
    #[serde(default)]
    pub period: DeadlinePeriod,
}

/// Read .state.json from the data directory
pub fn read_view_state(data_dir: &Path) -> Option<ViewState> {
    let content = fs::read_to_string(data_dir.join(".state.json")).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_view_state(data_dir: &Path, state: &ViewState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    crate::io::recovery::atomic_write(&data_dir.join(".state.json"), content.as_bytes())
}
