//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the forwarder process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Upstream the write requests are relayed to.
    pub forward: ForwardConfig,

    /// Bearer tokens and the tenants they resolve to.
    pub tenants: Vec<TenantTokenConfig>,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Forward target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Upstream URL (e.g., "http://thanos-receive:19291/api/v1/receive").
    pub url: String,

    /// End-to-end timeout for one forward, in seconds.
    pub timeout_secs: u64,
}

impl ForwardConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 5,
        }
    }
}

/// One entry of the static token table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TenantTokenConfig {
    /// Bearer token presented by the client.
    pub token: String,

    /// Tenant the token resolves to.
    pub tenant: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
