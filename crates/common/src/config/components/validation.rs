use serde::Deserialize;
use std::time::Duration;

// ---------------- Validation Config ----------------
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Upper bound for one live probe of a source database.
    pub probe_timeout_ms: u64,
}

impl ValidationConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 5_000,
        }
    }
}
