// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact intake service.
//!
//! Every field has a serde default, so a partial config (or none at all)
//! yields the production defaults: 3 submissions per client per 60 seconds
//! and the in-memory store unless a database URL is supplied.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

const MAX_ATTEMPTS_RANGE: RangeInclusive<u32> = 1..=10_000;
const WINDOW_SECS_RANGE: RangeInclusive<u64> = 1..=86_400;
const FIELD_CHARS_RANGE: RangeInclusive<usize> = 1..=1_000_000;
const MAX_CONNECTIONS_RANGE: RangeInclusive<u32> = 1..=100;

/// Configuration for the contact intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Take the client identifier from `X-Forwarded-For` (default: false)
    #[serde(default)]
    pub trust_forwarded_for: bool,

    /// Origins allowed by CORS. Empty means same-origin only.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Per-client submission limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admitted submissions per client within one window (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Window length in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval of the background sweep in seconds (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Field limits for contact submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum characters for name, email and company (default: 256)
    #[serde(default = "default_max_field_chars")]
    pub max_field_chars: usize,

    /// Maximum characters for the message body (default: 5000)
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

/// Which storage backend to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Postgres when a database URL is present, memory otherwise
    #[default]
    Auto,
    /// Always in-memory
    Memory,
    /// Always Postgres; unavailable if no URL is configured
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "memory" => Ok(Self::Memory),
            "postgres" => Ok(Self::Postgres),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Postgres connection string
    #[serde(default)]
    pub database_url: Option<String>,

    /// Pool size for the Postgres backend (default: 5)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_window_secs() -> u64 {
    60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_max_field_chars() -> usize {
    256
}

fn default_max_message_chars() -> usize {
    5000
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            trust_forwarded_for: false,
            allowed_origins: Vec::new(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            storage: StorageConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_field_chars: default_max_field_chars(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Idle time after which an entry is dropped (twice the window)
    pub fn idle_expiry(&self) -> Duration {
        self.window_duration().saturating_mul(2)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            trust_forwarded_for: parse_var(&lookup, "TRUST_FORWARDED_FOR")
                .unwrap_or(defaults.trust_forwarded_for),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.allowed_origins),
            rate_limit: RateLimitConfig {
                max_attempts: parse_in_range(
                    &lookup,
                    "RATE_LIMIT_MAX_ATTEMPTS",
                    MAX_ATTEMPTS_RANGE,
                )
                .unwrap_or(defaults.rate_limit.max_attempts),
                window_secs: parse_in_range(
                    &lookup,
                    "RATE_LIMIT_WINDOW_SECS",
                    WINDOW_SECS_RANGE,
                )
                .unwrap_or(defaults.rate_limit.window_secs),
                sweep_interval_secs: parse_in_range(
                    &lookup,
                    "SWEEP_INTERVAL_SECS",
                    WINDOW_SECS_RANGE,
                )
                .unwrap_or(defaults.rate_limit.sweep_interval_secs),
            },
            validation: ValidationConfig {
                max_field_chars: parse_in_range(
                    &lookup,
                    "MAX_FIELD_CHARS",
                    FIELD_CHARS_RANGE,
                )
                .unwrap_or(defaults.validation.max_field_chars),
                max_message_chars: parse_in_range(
                    &lookup,
                    "MAX_MESSAGE_CHARS",
                    FIELD_CHARS_RANGE,
                )
                .unwrap_or(defaults.validation.max_message_chars),
            },
            storage: StorageConfig {
                backend: parse_var(&lookup, "STORAGE_BACKEND")
                    .unwrap_or(defaults.storage.backend),
                database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
                max_connections: parse_in_range(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    MAX_CONNECTIONS_RANGE,
                )
                .unwrap_or(defaults.storage.max_connections),
            },
            metrics: MetricsConfig {
                enabled: parse_var(&lookup, "METRICS_ENABLED")
                    .unwrap_or(defaults.metrics.enabled),
                path: lookup("METRICS_PATH").unwrap_or(defaults.metrics.path),
            },
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Unparseable config value, using default");
            None
        }
    }
}

fn parse_in_range<T, F>(lookup: &F, key: &str, range: RangeInclusive<T>) -> Option<T>
where
    T: FromStr + PartialOrd + Display,
    F: Fn(&str) -> Option<String>,
{
    let value = parse_var(lookup, key)?;
    if range.contains(&value) {
        Some(value)
    } else {
        warn!(
            key,
            %value,
            min = %range.start(),
            max = %range.end(),
            "Config value out of range, using default"
        );
        None
    }
}
