use crate::dns::forwarding::ResponseParser;
use crate::dns::transport::DnsTransport;
use hickory_proto::op::Message;
use hoopoe_domain::DomainError;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a single-server query attempt
pub struct QueryAttemptResult {
    pub message: Message,
    pub latency_ms: u64,
}

/// Sends an already encoded query to one server and decodes the reply.
///
/// A reply that does not decode, or that carries another id, is reported as
/// `InvalidDnsResponse` so callers treat it like any other failed exchange.
pub async fn query_server(
    transport: &dyn DnsTransport,
    server: &str,
    query_id: u16,
    query_bytes: &[u8],
    timeout: Duration,
) -> Result<QueryAttemptResult, DomainError> {
    let start = Instant::now();

    let response = transport.send(server, query_bytes, timeout).await?;
    let message = ResponseParser::parse(&response.bytes, query_id)?;
    let latency_ms = start.elapsed().as_millis() as u64;

    debug!(
        server = %server,
        protocol = response.protocol_used,
        answers = message.answers().len(),
        rcode = ?message.response_code(),
        latency_ms,
        "Upstream replied"
    );

    Ok(QueryAttemptResult {
        message,
        latency_ms,
    })
}
