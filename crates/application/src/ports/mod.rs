mod access_log;
mod upstream_forwarder;

pub use access_log::AccessLogPort;
pub use upstream_forwarder::{UpstreamForwarder, UpstreamReply};
