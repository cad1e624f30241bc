//! Configuration
//!
//! Two layers:
//!
//! - [`HostConfig`]: the host cluster's string key/value configuration. The
//!   admin endpoint only reads the balancer settings from it.
//! - [`AdminConfig`]: the standalone server's TOML file, which embeds the
//!   host properties under `[cluster.properties]`.
//!
//! # Example
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:16010"
//!
//! [logging]
//! level = "debug"
//!
//! [cluster]
//! servers = ["rs1:16020", "rs2:16020"]
//!
//! [cluster.properties]
//! "cluster.balancer.class" = "GroupBasedLoadBalancer"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::model::Address;
use crate::protocol::error::{GroupAdminError, Result};

/// Host configuration key naming the balancer implementation class.
pub const BALANCER_CLASS_KEY: &str = "cluster.balancer.class";

/// Host configuration key switching the balancer on or off.
pub const BALANCER_ENABLED_KEY: &str = "cluster.balancer.enabled";

/// Balancer class that understands server groups.
pub const GROUP_BALANCER_CLASS: &str = "GroupBasedLoadBalancer";

/// String key/value configuration of the host cluster manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostConfig {
    properties: BTreeMap<String, String>,
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Reads a boolean, falling back to `default` when unset.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(v) => v.trim().parse::<bool>().map_err(|_| {
                GroupAdminError::Configuration(format!(
                    "Value '{}' of '{}' is not a boolean",
                    v, key
                ))
            }),
        }
    }

    /// Configured balancer class, if any.
    pub fn balancer_class(&self) -> Option<&str> {
        self.get(BALANCER_CLASS_KEY)
    }

    pub fn balancer_enabled(&self) -> Result<bool> {
        self.get_bool(BALANCER_ENABLED_KEY, true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the admin HTTP server binds to
    pub bind: String,
    /// Shared secret required in `X-API-Key`; authentication is off when unset
    pub api_key: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:16010".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    /// Online servers; they start out in the default group
    pub servers: Vec<String>,
    /// Host configuration handed to the admin endpoint
    pub properties: HostConfig,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            properties: HostConfig::new().with(BALANCER_CLASS_KEY, GROUP_BALANCER_CLASS),
        }
    }
}

/// Standalone admin server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub cluster: ClusterSettings,
}

impl AdminConfig {
    /// Loads and validates a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            GroupAdminError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AdminConfig = toml::from_str(content).map_err(|e| {
            GroupAdminError::Configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            return Err(GroupAdminError::Configuration(
                "server.bind cannot be empty".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(GroupAdminError::Configuration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        self.server_addresses()?;
        self.cluster.properties.balancer_enabled()?;
        Ok(())
    }

    /// Parses `cluster.servers`.
    pub fn server_addresses(&self) -> Result<Vec<Address>> {
        self.cluster
            .servers
            .iter()
            .map(|s| {
                s.parse::<Address>().map_err(|e| {
                    GroupAdminError::Configuration(format!("cluster.servers: {}", e))
                })
            })
            .collect()
    }
}
