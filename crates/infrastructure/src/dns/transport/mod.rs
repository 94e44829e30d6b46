pub mod resolver;
pub mod udp;

use async_trait::async_trait;
use hoopoe_domain::DomainError;
use std::time::Duration;

pub use udp::UdpTransport;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

/// One request/response exchange with an upstream resolver.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        server: &str,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
