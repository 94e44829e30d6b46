use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::access_log::AccessLogConfig;
use super::errors::ConfigError;
use super::logging::{LogFormat, LoggingConfig};
use super::rules::RulesConfig;
use super::server::ServerConfig;
use super::telemetry::TelemetryConfig;
use super::upstream::UpstreamConfig;

/// Main configuration structure for Hoopoe
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Listener configuration
    pub server: ServerConfig,

    /// Upstream resolvers, load balancing and forwarding budget
    pub upstream: UpstreamConfig,

    /// Pass / allow / deny / rewrite rules
    pub rules: RulesConfig,

    /// YAML (or TOML) file mapping regions to client networks
    pub client_map_file: String,

    pub telemetry: TelemetryConfig,

    pub access_log: AccessLogConfig,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            rules: RulesConfig::default(),
            client_map_file: default_client_map_file(),
            telemetry: TelemetryConfig::default(),
            access_log: AccessLogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. hoopoe.toml in current directory
    /// 3. /etc/hoopoe/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(address) = overrides.address {
            self.server.address = address;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.address.parse::<SocketAddr>().map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid listen address '{}': {}",
                self.server.address, e
            ))
        })?;

        if self.upstream.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }

        for server in &self.upstream.servers {
            if server.address.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Upstream server with empty address".to_string(),
                ));
            }
        }

        self.upstream.timeout_duration()?;

        if self.telemetry.enabled {
            self.telemetry.address.parse::<SocketAddr>().map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid telemetry address '{}': {}",
                    self.telemetry.address, e
                ))
            })?;
        }

        Ok(())
    }

    /// Settings that are legal but probably not what the operator meant.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.access_log.enabled && self.access_log.path.trim().is_empty() {
            warnings.push("Access log enabled with an empty path, it will be skipped".to_string());
        }

        warnings
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("hoopoe.toml").exists() {
            Some("hoopoe.toml".to_string())
        } else if std::path::Path::new("/etc/hoopoe/config.toml").exists() {
            Some("/etc/hoopoe/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub address: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

fn default_client_map_file() -> String {
    "/etc/hoopoe/client_map.yml".to_string()
}
