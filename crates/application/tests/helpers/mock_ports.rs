#![allow(dead_code)]

use async_trait::async_trait;
use hickory_proto::op::Message;
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use hoopoe_application::ports::{AccessLogPort, UpstreamForwarder, UpstreamReply};
use hoopoe_domain::{AccessLogEntry, DomainError, Query, RequestMetadata};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

pub fn answer_message(name: &str, ip: Ipv4Addr) -> Message {
    let mut message = Message::new();
    let record = Record::from_rdata(Name::from_str(name).unwrap(), 60, RData::A(A(ip)));
    message.add_answer(record);
    message
}

#[derive(Clone)]
pub struct MockUpstreamForwarder {
    forwarded: Arc<Mutex<Vec<(Query, RequestMetadata)>>>,
    fail_with: Arc<Mutex<Option<DomainError>>>,
}

impl MockUpstreamForwarder {
    pub fn new() -> Self {
        Self {
            forwarded: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_failure(&self, error: DomainError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    pub fn forwarded(&self) -> Vec<(Query, RequestMetadata)> {
        self.forwarded.lock().unwrap().clone()
    }

    pub fn forwarded_names(&self) -> Vec<String> {
        self.forwarded()
            .into_iter()
            .map(|(q, _)| q.name.to_string())
            .collect()
    }
}

impl Default for MockUpstreamForwarder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamForwarder for MockUpstreamForwarder {
    async fn forward(
        &self,
        query: &Query,
        metadata: &RequestMetadata,
    ) -> Result<UpstreamReply, DomainError> {
        self.forwarded
            .lock()
            .unwrap()
            .push((query.clone(), metadata.clone()));

        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err);
        }

        Ok(UpstreamReply::new(
            answer_message(&query.name, Ipv4Addr::new(192, 0, 2, 1)),
            "10.0.0.1:53",
            3,
        ))
    }
}

#[derive(Clone, Default)]
pub struct MockAccessLog {
    entries: Arc<Mutex<Vec<AccessLogEntry>>>,
}

impl MockAccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AccessLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl AccessLogPort for MockAccessLog {
    fn record(&self, entry: AccessLogEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}
