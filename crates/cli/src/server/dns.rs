use hoopoe_infrastructure::DnsServerHandler;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

/// Receives datagrams on one socket and handles each in its own task.
pub async fn start_dns_server(bind_addr: &str, handler: DnsServerHandler) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let socket = Arc::new(UdpSocket::bind(socket_addr).await?);
    let handler = Arc::new(handler);

    info!(bind_address = %socket.local_addr()?, "DNS proxy listening");

    let mut recv_buf = [0u8; 4096];
    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error!(error = %e, "UDP recv error");
                continue;
            }
        };

        let query_buf: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);
        tokio::spawn(async move {
            if let Some(response) = handler.handle_raw_udp(&query_buf, from.ip()).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "Failed to send reply");
                }
            }
        });
    }
}
