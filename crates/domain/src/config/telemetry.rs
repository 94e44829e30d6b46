use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_telemetry_address")]
    pub address: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: default_telemetry_address(),
        }
    }
}

fn default_telemetry_address() -> String {
    "127.0.0.1:8080".to_string()
}
