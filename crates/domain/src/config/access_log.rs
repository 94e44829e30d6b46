use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessLogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_access_log_path")]
    pub path: String,
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_access_log_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_access_log_path() -> String {
    "/var/log/hoopoe/access.log".to_string()
}
