#![allow(dead_code)]
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// UDP resolver answering every question with one A record.
pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(answer: Ipv4Addr) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let response = Self::build_mock_response(&buf[..len], answer);
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Echoes the header and question, then appends an A record pointing
    /// back at the question name.
    fn build_mock_response(query: &[u8], answer: Ipv4Addr) -> Vec<u8> {
        if query.len() < 12 {
            return vec![];
        }

        let mut response = Vec::with_capacity(512);

        response.extend_from_slice(&query[0..2]);

        // QR, RD, RA
        response.push(0x81);
        response.push(0x80);

        response.extend_from_slice(&query[4..6]);

        response.extend_from_slice(&[0x00, 0x01]);

        response.extend_from_slice(&[0x00, 0x00]);

        response.extend_from_slice(&[0x00, 0x00]);

        if query.len() > 12 {
            response.extend_from_slice(&query[12..]);
        }

        response.extend_from_slice(&[
            0xc0, 0x0c, // pointer to the question name
            0x00, 0x01, // A
            0x00, 0x01, // IN
            0x00, 0x00, 0x00, 0x3c, // TTL 60
            0x00, 0x04,
        ]);
        response.extend_from_slice(&answer.octets());

        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
