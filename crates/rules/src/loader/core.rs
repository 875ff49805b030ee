//! Core [`PolicyLoader`] struct: reads and checks a policy file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::schema::PolicyDocument;

use super::error::{LoadError, Result};

/// Loads the policy document from a YAML file.
///
/// The loader keeps no document state of its own; every call to
/// [`load`](Self::load) reads the file again, so the engine can reload on
/// demand and keep its previous document when a reload fails.
#[derive(Debug, Clone)]
pub struct PolicyLoader {
    path: PathBuf,
}

impl PolicyLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the policy file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, deserialize and check the policy file.
    pub fn load(&self) -> Result<PolicyDocument> {
        let contents = fs::read_to_string(&self.path)?;
        let doc = Self::load_str(&contents)?;
        info!(
            path = %self.path.display(),
            groups = doc.groups.len(),
            rules = doc.rule_count(),
            "loaded policy document"
        );
        Ok(doc)
    }

    /// Deserialize and check a policy document from YAML text.
    pub fn load_str(contents: &str) -> Result<PolicyDocument> {
        let doc: PolicyDocument = serde_yaml::from_str(contents)?;
        check_groups(&doc)?;
        Ok(doc)
    }
}

/// Reject documents the scheduler cannot key or time.
fn check_groups(doc: &PolicyDocument) -> Result<()> {
    let mut seen = HashSet::new();

    for (i, group) in doc.groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            return Err(LoadError::Validation(format!(
                "groups[{}].name must not be empty",
                i
            )));
        }
        if !seen.insert(group.name.as_str()) {
            return Err(LoadError::Validation(format!(
                "duplicate group name '{}'",
                group.name
            )));
        }
        if let Err(raw) = group.interval() {
            return Err(LoadError::Validation(format!(
                "group '{}': invalid interval '{}'",
                group.name, raw
            )));
        }
    }

    Ok(())
}
