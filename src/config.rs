// src/config.rs
//
// Runtime configuration
//
// Every section has a Default so an absent or partial config file is valid.
// Durations are stored as milliseconds to keep the JSON format flat.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::services::ConnectionMessages;

/// UDP port servers listen on for discovery broadcasts
pub const DISCOVERY_PORT: u16 = 7359;

/// Upper bound of servers yielded by a single discovery run
pub const DISCOVERY_MAX_SERVERS: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    pub discovery: DiscoveryConfig,

    /// Text of a failed connection attempt
    pub messages: ConnectionMessages,

    /// Overrides the default `{data_dir}/serverhub/serverhub.db`
    pub database_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults for
    /// missing sections. `None` yields the defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str::<AppConfig>(&raw).map_err(|e| {
                    AppError::Config(format!("Invalid config file {}: {}", path.display(), e))
                })?
            }
            None => AppConfig::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.connection.probe_timeout_ms == 0 {
            return Err(AppError::Config("probe_timeout_ms must be positive".to_string()));
        }
        if self.connection.slow_response_ms > self.connection.very_slow_response_ms {
            return Err(AppError::Config(
                "slow_response_ms cannot exceed very_slow_response_ms".to_string(),
            ));
        }
        if self.discovery.max_servers == 0 {
            return Err(AppError::Config("max_servers must be positive".to_string()));
        }
        if self.discovery.broadcast_addresses.is_empty() {
            return Err(AppError::Config("at least one broadcast address is required".to_string()));
        }
        Ok(())
    }
}

/// Probing and scoring thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Per-candidate HTTP timeout
    pub probe_timeout_ms: u64,

    /// Responses slower than this lose the GREAT speed rating
    pub slow_response_ms: u64,

    /// Responses slower than this are rated OK at best
    pub very_slow_response_ms: u64,

    /// Sent as the User-Agent of probe requests
    pub client_name: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 10_000,
            slow_response_ms: 3_000,
            very_slow_response_ms: 7_000,
            client_name: format!("serverhub/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ConnectionConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn slow_response(&self) -> Duration {
        Duration::from_millis(self.slow_response_ms)
    }

    pub fn very_slow_response(&self) -> Duration {
        Duration::from_millis(self.very_slow_response_ms)
    }
}

/// Local network discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub port: u16,
    pub max_servers: usize,

    /// Discovery ends once no reply arrives within this window
    pub receive_timeout_ms: u64,

    pub broadcast_addresses: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            port: DISCOVERY_PORT,
            max_servers: DISCOVERY_MAX_SERVERS,
            receive_timeout_ms: 500,
            broadcast_addresses: vec!["255.255.255.255".to_string()],
        }
    }
}

impl DiscoveryConfig {
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }
}
