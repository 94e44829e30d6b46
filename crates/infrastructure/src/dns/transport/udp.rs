//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! One ephemeral, connected socket per exchange. Connecting lets ICMP
//! port-unreachable surface as `ConnectionRefused` instead of a timeout.

use super::{resolver, DnsTransport, TransportResponse};
use async_trait::async_trait;
use hoopoe_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

#[derive(Debug, Default, Clone, Copy)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        Self
    }
}

fn map_io_error(server: &str, e: io::Error) -> DomainError {
    let server = server.to_string();
    match e.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused { server },
        io::ErrorKind::ConnectionReset => DomainError::TransportConnectionReset { server },
        io::ErrorKind::TimedOut => DomainError::TransportTimeout { server },
        _ => DomainError::TransportIo {
            server,
            message: e.to_string(),
        },
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        server: &str,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let deadline = Instant::now() + timeout;
        let server_addr = resolver::resolve_server(server, timeout).await?;

        let bind_addr = if server_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| map_io_error(server, e))?;
        socket
            .connect(server_addr)
            .await
            .map_err(|e| map_io_error(server, e))?;

        let bytes_sent = socket
            .send(message_bytes)
            .await
            .map_err(|e| map_io_error(server, e))?;

        debug!(server = %server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let remaining = deadline.saturating_duration_since(Instant::now());

        let bytes_received = tokio::time::timeout(remaining, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.to_string(),
            })?
            .map_err(|e| map_io_error(server, e))?;

        recv_buf.truncate(bytes_received);

        debug!(server = %server_addr, bytes_received, "UDP response received");

        Ok(TransportResponse {
            bytes: recv_buf,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
