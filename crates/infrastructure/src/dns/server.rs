use crate::dns::forwarding::{MessageBuilder, ReplyBuilder};
use crate::telemetry::UpstreamMetrics;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hoopoe_application::use_cases::HandleDnsQueryUseCase;
use hoopoe_domain::{DomainError, Query};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Turns one inbound datagram into the datagram to send back, if any.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
    metrics: UpstreamMetrics,
}

/// What the client gets for a failed request.
enum Outcome {
    Reply(ResponseCode),
    Silence,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self {
            use_case,
            metrics: UpstreamMetrics::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: UpstreamMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &UpstreamMetrics {
        &self.metrics
    }

    pub async fn handle_raw_udp(&self, datagram: &[u8], client_ip: IpAddr) -> Option<Vec<u8>> {
        self.metrics.record_received();

        let request = match Message::from_vec(datagram) {
            Ok(message) => message,
            Err(e) => {
                debug!(client = %client_ip, error = %e, "Malformed DNS request");
                return ReplyBuilder::format_error(datagram).and_then(|m| encode(&m));
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(client = %client_ip, "Ignoring DNS response sent to the listener");
            return None;
        }

        let Some(question) = request.queries().first() else {
            debug!(client = %client_ip, "DNS request without a question");
            return encode(&ReplyBuilder::error(&request, ResponseCode::FormErr));
        };

        let name = question.name().to_lowercase().to_ascii();
        let query = Query::new(name.as_str(), u16::from(question.query_type()));

        debug!(client = %client_ip, domain = %name, record_type = %question.query_type(), "DNS query received");

        match self.use_case.execute(query, client_ip).await {
            Ok(reply) => {
                self.metrics.record_allowed();
                encode(&ReplyBuilder::answer(&request, &reply.message))
            }
            Err(e) => match classify(&e) {
                Outcome::Reply(code) => {
                    if code == ResponseCode::Refused {
                        self.metrics.record_blocked();
                    } else {
                        error!(error = %e, domain = %name, "Query handling failed");
                    }
                    encode(&ReplyBuilder::error(&request, code))
                }
                Outcome::Silence => {
                    self.metrics.record_unanswered();
                    None
                }
            },
        }
    }
}

fn classify(error: &DomainError) -> Outcome {
    if error.is_policy_block() {
        return Outcome::Reply(ResponseCode::Refused);
    }
    if error.is_transport_error() {
        return Outcome::Silence;
    }
    match error {
        DomainError::TransportAllServersUnreachable
        | DomainError::QueryTimeout
        | DomainError::NoUpstreamServers => Outcome::Silence,
        _ => Outcome::Reply(ResponseCode::ServFail),
    }
}

fn encode(message: &Message) -> Option<Vec<u8>> {
    match MessageBuilder::serialize_message(message) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(error = %e, "Failed to encode reply");
            None
        }
    }
}
