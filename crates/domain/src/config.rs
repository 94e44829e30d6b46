pub mod access_log;
pub mod errors;
pub mod logging;
pub mod root;
pub mod rules;
pub mod server;
pub mod telemetry;
pub mod upstream;

pub use access_log::AccessLogConfig;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config};
pub use rules::RulesConfig;
pub use server::ServerConfig;
pub use telemetry::TelemetryConfig;
pub use upstream::{LoadBalanceType, UpstreamConfig};
