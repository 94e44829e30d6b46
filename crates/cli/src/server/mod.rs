pub mod dns;
pub mod telemetry;

pub use dns::start_dns_server;
pub use telemetry::start_telemetry_server;
