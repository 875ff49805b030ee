//! Per-group schedule entry type.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Scheduling state for a single group.
#[derive(Debug, Clone)]
pub struct GroupScheduleEntry {
    /// Group name (matches `PolicyGroup.name`).
    pub name: String,
    /// Position of the group in the document; due groups run in this order.
    pub position: usize,
    /// Minimum time between runs. `None` runs on every tick.
    pub interval: Option<Duration>,
    /// Timestamp of the last run.
    pub last_run: Option<DateTime<Utc>>,
}
