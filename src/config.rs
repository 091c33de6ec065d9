//! Connection settings for one managed server.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 20;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Daemon endpoint, credentials and the server being managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Daemon API root, e.g. `https://node1.example.com/api`
    pub base_url: String,
    /// Bearer token passed through to the daemon
    pub token: String,
    /// Identifier of the managed server
    pub server_id: String,
    /// Static disk allocation used when the daemon cannot report a limit
    #[serde(default)]
    pub allocation_bytes: Option<u64>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        server_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            server_id: server_id.into(),
            allocation_bytes: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the fallback disk allocation.
    pub fn with_allocation(mut self, bytes: u64) -> Self {
        self.allocation_bytes = Some(bytes);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Read `SERVERFS_BASE_URL`, `SERVERFS_TOKEN`, `SERVERFS_SERVER_ID` and
    /// the optional `SERVERFS_ALLOCATION_BYTES` / `SERVERFS_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| Error::Config(format!("{} is not set", key)))
        };
        let numeric = |key: &str| -> Result<Option<u64>> {
            lookup(key)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .map_err(|e| Error::Config(format!("{} is not a number: {}", key, e)))
                })
                .transpose()
        };

        let mut config = Self::new(
            required("SERVERFS_BASE_URL")?,
            required("SERVERFS_TOKEN")?,
            required("SERVERFS_SERVER_ID")?,
        );
        config.allocation_bytes = numeric("SERVERFS_ALLOCATION_BYTES")?;
        if let Some(secs) = numeric("SERVERFS_TIMEOUT_SECS")? {
            config.request_timeout_secs = secs;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base_url is empty".to_string()));
        }
        if self.server_id.trim().is_empty() {
            return Err(Error::Config("server_id is empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
