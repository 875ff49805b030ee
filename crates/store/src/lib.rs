//! Sample store adaptor for policy evaluation.
//!
//! Given the variable reference on the left side of a policy expression,
//! a [`SampleStore`] returns one [`SampleSeries`] per matching resource with
//! the samples observed in a trailing time window.
//!
//! - [`RedisStore`]: collectd samples kept in Redis sorted sets
//! - [`MemoryStore`]: fixed in-process series for tests and dry runs

mod error;
mod memory;
mod redis_store;
mod variable;

use async_trait::async_trait;
use policy_core::SampleSeries;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use redis_store::{label_from_key, parse_member, RedisStore};
pub use variable::{SampleField, VariableRef};

/// Source of per-resource sample series.
///
/// Implementations must report "no matching data" as an empty list; only
/// genuine I/O failures are errors.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Fetch the samples for every resource matching `variable`.
    async fn fetch(&self, variable: &str) -> Result<Vec<SampleSeries>>;
}
