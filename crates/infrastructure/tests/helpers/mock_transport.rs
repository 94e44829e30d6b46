#![allow(dead_code)]

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use hoopoe_domain::DomainError;
use hoopoe_infrastructure::dns::transport::{DnsTransport, TransportResponse};
use hoopoe_infrastructure::dns::MessageBuilder;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum ServerBehavior {
    Answer(Ipv4Addr),
    /// Well-formed reply with an empty answer section.
    Negative(ResponseCode),
    Refuse,
    /// Reply whose id does not match the query.
    WrongId,
}

/// Scripted transport: each server address maps to a fixed behavior;
/// unknown servers refuse the connection.
#[derive(Clone, Default)]
pub struct MockTransport {
    behaviors: Arc<Mutex<HashMap<String, ServerBehavior>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(self, server: &str, behavior: ServerBehavior) -> Self {
        self.behaviors
            .lock()
            .unwrap()
            .insert(server.to_string(), behavior);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn reply(query_bytes: &[u8], behavior: &ServerBehavior) -> Vec<u8> {
        let query = Message::from_vec(query_bytes).unwrap();

        let mut reply = Message::new();
        reply
            .set_id(query.id())
            .set_message_type(MessageType::Response)
            .set_recursion_desired(query.recursion_desired())
            .set_recursion_available(true);
        reply.add_queries(query.queries().iter().cloned());

        match behavior {
            ServerBehavior::Answer(ip) => {
                let name = query.queries()[0].name().clone();
                reply.add_answer(Record::from_rdata(name, 60, RData::A(A(*ip))));
            }
            ServerBehavior::Negative(code) => {
                reply.set_response_code(*code);
            }
            ServerBehavior::WrongId => {
                reply.set_id(query.id().wrapping_add(1));
            }
            ServerBehavior::Refuse => unreachable!(),
        }

        MessageBuilder::serialize_message(&reply).unwrap()
    }
}

#[async_trait]
impl DnsTransport for MockTransport {
    async fn send(
        &self,
        server: &str,
        message_bytes: &[u8],
        _timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        self.calls.lock().unwrap().push(server.to_string());

        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(server)
            .cloned()
            .unwrap_or(ServerBehavior::Refuse);

        if let ServerBehavior::Refuse = behavior {
            return Err(DomainError::TransportConnectionRefused {
                server: server.to_string(),
            });
        }

        Ok(TransportResponse {
            bytes: Self::reply(message_bytes, &behavior),
            protocol_used: "MOCK",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "MOCK"
    }
}
