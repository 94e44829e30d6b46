use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;
use crate::upstream_server::UpstreamServer;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub servers: Vec<UpstreamServer>,

    #[serde(default)]
    pub lb_type: LoadBalanceType,

    /// Total budget for one forwarded query across all retries, e.g. `"5s"`
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum LoadBalanceType {
    #[default]
    #[serde(alias = "by_order", alias = "byorder")]
    ByOrder,

    #[serde(alias = "round_robin", alias = "roundrobin")]
    RoundRobin,
}

impl LoadBalanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ByOrder => "ByOrder",
            Self::RoundRobin => "RoundRobin",
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: vec![],
            lb_type: LoadBalanceType::ByOrder,
            timeout: default_timeout(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout_duration(&self) -> Result<Duration, ConfigError> {
        let duration = humantime::parse_duration(self.timeout.trim()).map_err(|e| {
            ConfigError::Validation(format!("Invalid upstream timeout '{}': {}", self.timeout, e))
        })?;

        if duration.is_zero() {
            return Err(ConfigError::Validation(
                "Upstream timeout must be greater than zero".to_string(),
            ));
        }

        Ok(duration)
    }
}

fn default_timeout() -> String {
    "5s".to_string()
}
