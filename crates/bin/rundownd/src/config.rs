//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `rundown.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use rundown_adapter_vmix::VmixConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Which device receives the commands and how to reach it.
    pub device: DeviceConfig,
    /// Sequencer pacing.
    pub playback: PlaybackConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Operator log settings.
    pub log_sink: LogSinkConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Device backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// vMix Web API over HTTP.
    #[default]
    Vmix,
    /// In-process simulated device.
    Virtual,
}

impl std::str::FromStr for DeviceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vmix" => Ok(Self::Vmix),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown device kind {other:?}, expected \"vmix\" or \"virtual\""
            ))),
        }
    }
}

/// Device configuration. The connection fields apply to vMix.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub kind: DeviceKind,
    #[serde(flatten)]
    pub vmix: VmixConfig,
}

/// Sequencer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Pause between two blocks of a sequence, in milliseconds.
    pub inter_block_gap_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Operator log configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSinkConfig {
    /// Entries buffered per live subscriber before it starts lagging.
    pub capacity: usize,
}

impl Config {
    /// Load configuration from `rundown.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if an
    /// override or the final configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("rundown.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("RUNDOWN_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("RUNDOWN_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Some(val) = var("RUNDOWN_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("RUNDOWN_DEVICE") {
            self.device.kind = val.parse()?;
        }
        if let Some(val) = var("RUNDOWN_VMIX_HOST") {
            self.device.vmix.host = val;
        }
        if let Some(val) = var("RUNDOWN_VMIX_PORT")
            && let Ok(port) = val.parse()
        {
            self.device.vmix.port = port;
        }
        if let Some(val) = var("RUNDOWN_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.device.kind == DeviceKind::Vmix && self.device.vmix.port == 0 {
            return Err(ConfigError::Validation(
                "device port must be non-zero".to_string(),
            ));
        }
        if self.device.vmix.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "device timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn inter_block_gap(&self) -> Duration {
        Duration::from_millis(self.playback.inter_block_gap_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            inter_block_gap_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "rundownd=info,rundown=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for LogSinkConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
