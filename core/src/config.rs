//! Client configuration.
//!
//! Defaults are layered under environment variables prefixed with
//! `DASHBOARD_API_`, e.g. `DASHBOARD_API_BASE_URL=https://api.example.com`.

use std::time::Duration;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "DASHBOARD_API_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root every request path is appended to.
    pub base_url: String,
    /// Per-request timeout covering connect, send and body read.
    pub timeout_secs: u64,
    /// Enables debug-level logging.
    pub dev_mode: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            dev_mode: false,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment().extract().map_err(Box::new)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(ClientConfig::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
