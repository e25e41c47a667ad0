use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7412;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub const ENV_HOST: &str = "RESULTCAST_HOST";
pub const ENV_PORT: &str = "RESULTCAST_PORT";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "RESULTCAST_CONNECT_TIMEOUT_MS";

/// Destination and connect deadline of a [`crate::NetworkResultSender`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SenderConfig {
    pub host: String,
    pub port: u16,

    /// Deadline for establishing each connection. Default: 5000.
    pub connect_timeout_ms: u64,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl SenderConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sub-millisecond remainders round up, so a non-zero timeout never becomes 0 ms.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = timeout
            .as_nanos()
            .div_ceil(1_000_000)
            .min(u64::MAX as u128) as u64;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load from a YAML file. Fields that are absent keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `RESULTCAST_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment, or a map in tests).
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_PORT) {
            self.port = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_PORT,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT_MS) {
            self.connect_timeout_ms =
                raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_CONNECT_TIMEOUT_MS,
                    value: raw.clone(),
                })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero".into()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
