//! vMix connection configuration.

use std::time::Duration;

use serde::Deserialize;

/// Where the vMix Web API listens and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VmixConfig {
    /// Hostname or IP address of the machine running vMix.
    pub host: String,
    /// Web controller port.
    pub port: u16,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for VmixConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8088,
            timeout_ms: 5000,
        }
    }
}

impl VmixConfig {
    /// `http://host:port/api/`
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("http://{}:{}/api/", self.host, self.port)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
