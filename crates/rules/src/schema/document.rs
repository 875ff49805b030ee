//! Policy document, group and rule types.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use policy_core::parse_duration;

/// A full policy file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PolicyDocument {
    #[serde(default)]
    pub groups: Vec<PolicyGroup>,
}

impl PolicyDocument {
    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&PolicyGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Total number of rules across all groups.
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// A named set of rules evaluated together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyGroup {
    pub name: String,
    /// Free-form tags attached to every report of the group.
    #[serde(rename = "annotation", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub annotations: BTreeSet<String>,
    /// Evaluation interval such as `10s` or `1m`. Absent means every tick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

impl PolicyGroup {
    /// Parsed interval.
    ///
    /// `Ok(None)` when no interval is configured, `Err` with the raw text when
    /// it cannot be parsed.
    pub fn interval(&self) -> Result<Option<Duration>, String> {
        match self.interval.as_deref() {
            None => Ok(None),
            Some(raw) => parse_duration(raw).map(Some).ok_or_else(|| raw.to_string()),
        }
    }
}

/// One named condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyRule {
    #[serde(default)]
    pub record: String,
    pub expr: String,
}
