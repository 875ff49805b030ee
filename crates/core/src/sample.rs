use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the entity a sample series belongs to: a virtual machine and,
/// optionally, one of its network interfaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceLabel {
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_resource_id: Option<String>,
}

impl ResourceLabel {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            sub_resource_id: None,
        }
    }

    pub fn with_sub_resource(resource_id: impl Into<String>, sub: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            sub_resource_id: Some(sub.into()),
        }
    }
}

impl fmt::Display for ResourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_resource_id {
            Some(sub) => write!(f, "{}/{}", self.resource_id, sub),
            None => write!(f, "{}", self.resource_id),
        }
    }
}

/// Samples observed for one resource within the evaluation window.
///
/// Order within `values` carries no meaning for evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    pub label: ResourceLabel,
    pub values: Vec<f64>,
}

impl SampleSeries {
    pub fn new(label: ResourceLabel, values: Vec<f64>) -> Self {
        Self { label, values }
    }
}
