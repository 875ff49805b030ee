use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;
use crate::error::PolicyError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub engine: EngineConfig,
    pub redis: RedisConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `POLICY_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("POLICY_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            engine: EngineConfig::from_env_profiled(p),
            redis: RedisConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  engine:  policy_file={}, tick={:?}, format={}",
            self.engine.policy_file.display(),
            self.engine.tick,
            self.engine.report_format
        );
        tracing::info!(
            "  redis:   host={}:{}, db={}, password={}, window={}s",
            self.redis.host,
            self.redis.port,
            self.redis.db,
            if self.redis.password.is_some() { "(set)" } else { "(none)" },
            self.redis.window_secs
        );
        tracing::info!(
            "  collectd: prefix={}, plugin={}, type={}",
            self.redis.key_prefix,
            self.redis.plugin,
            self.redis.type_instance
        );
    }
}

// ── Engine ────────────────────────────────────────────────────

/// Default scheduler tick.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub policy_file: PathBuf,
    pub tick: Duration,
    pub report_format: ReportFormat,
}

impl EngineConfig {
    fn from_env_profiled(p: &str) -> Self {
        let tick_raw = profiled_env_or(p, "POLICY_TICK", "1s");
        let tick = parse_duration(&tick_raw).unwrap_or_else(|| {
            tracing::warn!(value = %tick_raw, "invalid POLICY_TICK, using default");
            DEFAULT_TICK
        });

        let format_raw = profiled_env_or(p, "POLICY_REPORT_FORMAT", "text");
        let report_format = format_raw.parse::<ReportFormat>().unwrap_or_else(|e: PolicyError| {
            tracing::warn!(error = %e, "invalid POLICY_REPORT_FORMAT, using text");
            ReportFormat::Text
        });

        Self {
            policy_file: PathBuf::from(profiled_env_or(p, "POLICY_FILE", "policy.yaml")),
            tick,
            report_format,
        }
    }
}

/// Output format for rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(PolicyError::Config {
                key: "report_format".to_string(),
                message: format!("unknown format '{}', expected text or json", other),
            }),
        }
    }
}

// ── Redis sample store ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: u16,
    /// Trailing window read on every fetch.
    pub window_secs: u64,
    /// First key segment, e.g. `collectd`.
    pub key_prefix: String,
    /// collectd plugin segment, e.g. `virt`.
    pub plugin: String,
    /// collectd type segment, e.g. `if_octets`.
    pub type_instance: String,
}

impl RedisConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "REDIS_HOST", "localhost"),
            port: profiled_env_u16(p, "REDIS_PORT", 6379),
            password: profiled_env_opt(p, "REDIS_PASSWORD"),
            db: profiled_env_u16(p, "REDIS_DB", 0),
            window_secs: profiled_env_u64(p, "SAMPLE_WINDOW_SECS", 60),
            key_prefix: profiled_env_or(p, "COLLECTD_PREFIX", "collectd"),
            plugin: profiled_env_or(p, "COLLECTD_PLUGIN", "virt"),
            type_instance: profiled_env_or(p, "COLLECTD_TYPE", "if_octets"),
        }
    }

    pub fn connection_string(&self) -> String {
        match &self.password {
            Some(pass) => format!("redis://:{}@{}:{}/{}", pass, self.host, self.port, self.db),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
            window_secs: 60,
            key_prefix: "collectd".to_string(),
            plugin: "virt".to_string(),
            type_instance: "if_octets".to_string(),
        }
    }
}
