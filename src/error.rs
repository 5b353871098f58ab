use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced to the UI layer.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The source file is missing, unreadable, malformed or lacks a required
    /// column. Blocking: nothing downstream runs without a table.
    #[error("data unavailable from {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// The selected date range is inverted. Not fatal; filtering with it
    /// simply yields no rows.
    #[error("invalid date range: start {start} is after end {end}")]
    FilterStateInvalid { start: NaiveDate, end: NaiveDate },
}

impl DashboardError {
    pub fn data_unavailable(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
