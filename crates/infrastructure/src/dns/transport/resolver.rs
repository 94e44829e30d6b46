use hoopoe_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

/// Resolves an upstream `host:port` to a socket address, skipping the
/// lookup for literal IPs.
pub async fn resolve_server(server: &str, timeout: Duration) -> Result<SocketAddr, DomainError> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let mut addrs = tokio::time::timeout(timeout, tokio::net::lookup_host(server))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server.to_string(),
        })?
        .map_err(|e| DomainError::TransportIo {
            server: server.to_string(),
            message: format!("resolution failed: {}", e),
        })?;

    addrs.next().ok_or_else(|| DomainError::TransportIo {
        server: server.to_string(),
        message: "no addresses found".to_string(),
    })
}
