use async_trait::async_trait;
use hickory_proto::op::Message;
use hoopoe_domain::{DomainError, Query, RequestMetadata};
use std::sync::Arc;

/// First successful upstream answer for a forwarded query.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub message: Message,
    pub server: Arc<str>,
    pub latency_ms: u64,
}

impl UpstreamReply {
    pub fn new(message: Message, server: impl Into<Arc<str>>, latency_ms: u64) -> Self {
        Self {
            message,
            server: server.into(),
            latency_ms,
        }
    }
}

#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    /// Forwards `query` to an upstream chosen for the client's region,
    /// retrying other candidates until one answers or the budget runs out.
    async fn forward(
        &self,
        query: &Query,
        metadata: &RequestMetadata,
    ) -> Result<UpstreamReply, DomainError>;
}
