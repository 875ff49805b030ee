//! In-process sample store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use policy_core::SampleSeries;

use crate::error::Result;
use crate::SampleStore;

/// Fixed series keyed by the exact variable reference.
///
/// Unknown variables yield an empty list.
#[derive(Default)]
pub struct MemoryStore {
    series: RwLock<HashMap<String, Vec<SampleSeries>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the series returned for `variable`.
    pub fn insert(&self, variable: impl Into<String>, series: Vec<SampleSeries>) {
        self.series
            .write()
            .expect("series lock poisoned")
            .insert(variable.into(), series);
    }

    /// Remove everything stored for `variable`.
    pub fn remove(&self, variable: &str) {
        self.series
            .write()
            .expect("series lock poisoned")
            .remove(variable);
    }
}

#[async_trait]
impl SampleStore for MemoryStore {
    async fn fetch(&self, variable: &str) -> Result<Vec<SampleSeries>> {
        Ok(self
            .series
            .read()
            .expect("series lock poisoned")
            .get(variable)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy_core::ResourceLabel;

    #[tokio::test]
    async fn unknown_variable_is_empty() {
        let store = MemoryStore::new();
        assert!(store.fetch("vm.rx").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_then_fetch_and_remove() {
        let store = MemoryStore::new();
        store.insert(
            "vm.rx",
            vec![SampleSeries::new(ResourceLabel::new("vm1"), vec![1.0, 2.0])],
        );

        let series = store.fetch("vm.rx").await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].values, vec![1.0, 2.0]);

        store.remove("vm.rx");
        assert!(store.fetch("vm.rx").await.unwrap().is_empty());
    }
}
