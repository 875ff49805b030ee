//! [`GroupScheduler`]: tracks when each policy group last ran.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::schema::PolicyGroup;

use super::entry::GroupScheduleEntry;

/// Manages scheduling state for all loaded groups.
///
/// Call [`sync_groups`](GroupScheduler::sync_groups) whenever the document
/// changes (e.g., after reload). Use [`due_groups`](GroupScheduler::due_groups)
/// from the tick loop to find which groups should be evaluated.
#[derive(Debug, Default)]
pub struct GroupScheduler {
    entries: HashMap<String, GroupScheduleEntry>,
}

impl GroupScheduler {
    /// Create a new empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronize entries with the current set of groups.
    ///
    /// - Adds entries for new groups.
    /// - Updates interval and position for existing groups (preserves `last_run`).
    /// - Removes entries for groups no longer present.
    pub fn sync_groups(&mut self, groups: &[PolicyGroup]) {
        let current: HashSet<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        self.entries.retain(|name, _| current.contains(name.as_str()));

        for (position, group) in groups.iter().enumerate() {
            let interval = match group.interval() {
                Ok(interval) => interval,
                Err(raw) => {
                    warn!(group = %group.name, interval = %raw, "invalid group interval, running every tick");
                    None
                }
            };

            match self.entries.get_mut(&group.name) {
                Some(entry) => {
                    entry.position = position;
                    entry.interval = interval;
                }
                None => {
                    self.entries.insert(
                        group.name.clone(),
                        GroupScheduleEntry {
                            name: group.name.clone(),
                            position,
                            interval,
                            last_run: None,
                        },
                    );
                }
            }
        }
    }

    /// Check whether a group should run at the given instant.
    ///
    /// Unknown groups never run. Known groups run when they have never run,
    /// have no interval, or their interval has elapsed since the last run.
    pub fn should_run(&self, name: &str, now: DateTime<Utc>) -> bool {
        let entry = match self.entries.get(name) {
            Some(e) => e,
            None => return false,
        };

        match (entry.interval, entry.last_run) {
            (Some(interval), Some(last)) => {
                // A clock step backwards counts as no time elapsed.
                let elapsed = now.signed_duration_since(last).to_std().unwrap_or_default();
                if elapsed < interval {
                    debug!(
                        group = %name,
                        remaining_ms = (interval - elapsed).as_millis() as u64,
                        "group interval not elapsed"
                    );
                    return false;
                }
                true
            }
            _ => true,
        }
    }

    /// Record that a group ran at `at`.
    pub fn record_run(&mut self, name: &str, at: DateTime<Utc>) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.last_run = Some(at);
        }
    }

    /// Names of all groups due at `now`, in document order.
    pub fn due_groups(&self, now: DateTime<Utc>) -> Vec<&str> {
        let mut due: Vec<&GroupScheduleEntry> = self
            .entries
            .values()
            .filter(|e| self.should_run(&e.name, now))
            .collect();
        due.sort_by_key(|e| e.position);
        due.into_iter().map(|e| e.name.as_str()).collect()
    }

    /// Get a reference to a scheduling entry by group name.
    pub fn get(&self, name: &str) -> Option<&GroupScheduleEntry> {
        self.entries.get(name)
    }

    /// Number of tracked groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the scheduler has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
