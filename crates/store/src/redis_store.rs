//! Redis-backed sample store for collectd data.
//!
//! collectd writes one sorted set per resource and type instance, e.g.
//! `collectd/instance-00000001/virt/if_octets-tapd21acb51-35`, whose members
//! are `"<time>:<rx>:<tx>"` strings scored by unix time.

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use tracing::{debug, info, warn};

use policy_core::config::RedisConfig;
use policy_core::{ResourceLabel, SampleSeries};

use crate::error::Result;
use crate::variable::VariableRef;
use crate::SampleStore;

/// Reads trailing-window samples from Redis sorted sets.
pub struct RedisStore {
    conn: MultiplexedConnection,
    config: RedisConfig,
}

impl RedisStore {
    /// Open a multiplexed connection using the given settings.
    pub async fn connect(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.connection_string())?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!(
            host = %config.host,
            port = config.port,
            db = config.db,
            "connected to redis sample store"
        );
        Ok(Self { conn, config })
    }

    /// Read the members of one key scored within `[min, max]`.
    async fn range_by_score(&self, key: &str, min: i64, max: i64) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(key)
            .arg(min)
            .arg(max)
            .query_async(&mut conn)
            .await?;
        Ok(members)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = redis::cmd("KEYS").arg(pattern).query_async(&mut conn).await?;
        Ok(keys)
    }
}

#[async_trait]
impl SampleStore for RedisStore {
    async fn fetch(&self, variable: &str) -> Result<Vec<SampleSeries>> {
        let var = VariableRef::parse(variable)?;
        let pattern = var.key_pattern(
            &self.config.key_prefix,
            &self.config.plugin,
            &self.config.type_instance,
        );

        let mut keys = self.keys(&pattern).await?;
        keys.sort();
        debug!(variable, pattern = %pattern, keys = keys.len(), "resolved sample keys");

        let now = Utc::now().timestamp();
        let window = self.config.window_secs as i64;
        let index = var.field.index();

        let mut series = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(label) = label_from_key(&key) else {
                warn!(key = %key, "skipping key with unexpected layout");
                continue;
            };

            let members = self.range_by_score(&key, now - window, now).await?;
            let values = members
                .iter()
                .filter_map(|m| match parse_member(m, index) {
                    Some(v) => Some(v),
                    None => {
                        warn!(key = %key, member = %m, "skipping malformed sample");
                        None
                    }
                })
                .collect();

            series.push(SampleSeries::new(label, values));
        }

        Ok(series)
    }
}

/// Derive the resource label from a key such as
/// `collectd/instance-01/virt/if_octets-tap0`.
///
/// The interface is only set for `if_*` type instances.
pub fn label_from_key(key: &str) -> Option<ResourceLabel> {
    let parts: Vec<&str> = key.split('/').collect();
    if parts.len() != 4 || parts[1].is_empty() {
        return None;
    }

    let resource = parts[1];
    match parts[3].split_once('-') {
        Some((kind, instance)) if kind.starts_with("if_") && !instance.is_empty() => {
            Some(ResourceLabel::with_sub_resource(resource, instance))
        }
        _ => Some(ResourceLabel::new(resource)),
    }
}

/// Parse field `index` of a `"<time>:<rx>:<tx>"` member.
pub fn parse_member(member: &str, index: usize) -> Option<f64> {
    member.split(':').nth(index + 1)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_from_interface_key() {
        let label = label_from_key("collectd/instance-00000001/virt/if_octets-tapd21acb51-35").unwrap();
        assert_eq!(label.resource_id, "instance-00000001");
        assert_eq!(label.sub_resource_id.as_deref(), Some("tapd21acb51-35"));
    }

    #[test]
    fn label_from_non_interface_key() {
        let label = label_from_key("collectd/instance-00000001/virt/disk_octets-vda").unwrap();
        assert_eq!(label.resource_id, "instance-00000001");
        assert_eq!(label.sub_resource_id, None);
    }

    #[test]
    fn label_from_malformed_key() {
        assert!(label_from_key("collectd/instance-00000001").is_none());
        assert!(label_from_key("a/b/c/d/e").is_none());
    }

    #[test]
    fn parse_member_fields() {
        assert_eq!(parse_member("1530000000.5:120.5:33", 0), Some(120.5));
        assert_eq!(parse_member("1530000000.5:120.5:33", 1), Some(33.0));
        assert_eq!(parse_member("1530000000.5:120.5", 1), None);
        assert_eq!(parse_member("1530000000.5:abc:1", 0), None);
    }
}
