//! Hoopoe Infrastructure Layer
pub mod access_log;
pub mod dns;
pub mod telemetry;

pub use access_log::{AccessLogEmitter, AccessLogWriter};
pub use dns::{DnsServerHandler, LoadBalancedForwarder, UdpTransport};
pub use telemetry::UpstreamMetrics;
