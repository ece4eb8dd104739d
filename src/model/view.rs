use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::task::parse_date_only;

/// Which tasks the list shows by completion state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Incomplete tasks only
    Active,
    Completed,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            _ => Err(format!(
                "unknown filter '{}' (expected: all, active, completed)",
                s
            )),
        }
    }
}

/// Deadline sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    /// Latest deadline first
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// Inclusive deadline range.
///
/// Bounds are kept as the raw strings the user supplied; an empty or
/// malformed bound counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlinePeriod {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl DeadlinePeriod {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        DeadlinePeriod {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from_date(&self) -> Option<NaiveDate> {
        parse_date_only(&self.from)
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        parse_date_only(&self.to)
    }

    /// True when at least one bound has been set
    pub fn is_active(&self) -> bool {
        !self.from.is_empty() || !self.to.is_empty()
    }
}
