use super::pool::UpstreamPool;
use super::query::query_server;
use super::strategy::Strategy;
use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use crate::dns::transport::DnsTransport;
use crate::telemetry::UpstreamMetrics;
use async_trait::async_trait;
use hoopoe_application::ports::{UpstreamForwarder, UpstreamReply};
use hoopoe_domain::config::UpstreamConfig;
use hoopoe_domain::{DomainError, Query, RequestMetadata};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Forwards queries to the client's upstream partition, retrying failed
/// exchanges back to back until a server answers or the budget is spent.
pub struct LoadBalancedForwarder {
    pool: Arc<UpstreamPool>,
    strategy: Strategy,
    transport: Arc<dyn DnsTransport>,
    timeout: Duration,
    metrics: UpstreamMetrics,
}

impl LoadBalancedForwarder {
    pub fn new(
        pool: Arc<UpstreamPool>,
        strategy: Strategy,
        transport: Arc<dyn DnsTransport>,
        timeout: Duration,
    ) -> Self {
        Self {
            pool,
            strategy,
            transport,
            timeout,
            metrics: UpstreamMetrics::new(),
        }
    }

    pub fn from_config(
        config: &UpstreamConfig,
        transport: Arc<dyn DnsTransport>,
    ) -> Result<Self, DomainError> {
        let timeout = config
            .timeout_duration()
            .map_err(|e| DomainError::ConfigError(e.to_string()))?;
        let pool = UpstreamPool::new(&config.servers)?;
        Ok(Self::new(
            Arc::new(pool),
            Strategy::from(config.lb_type),
            transport,
            timeout,
        ))
    }

    pub fn with_metrics(mut self, metrics: UpstreamMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn pool(&self) -> &UpstreamPool {
        &self.pool
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl UpstreamForwarder for LoadBalancedForwarder {
    async fn forward(
        &self,
        query: &Query,
        metadata: &RequestMetadata,
    ) -> Result<UpstreamReply, DomainError> {
        let partition = self.pool.select(&metadata.region);
        if partition.is_empty() {
            return Err(DomainError::NoUpstreamServers);
        }

        let (query_id, query_bytes) = MessageBuilder::build_query(&query.name, query.record_type)?;

        let started = Instant::now();
        let mut attempts = 0usize;

        debug!(
            strategy = self.strategy.name(),
            region = %metadata.region,
            candidates = partition.len(),
            domain = %query.name,
            "Forwarding"
        );

        loop {
            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                debug!(domain = %query.name, attempts, "Forwarding budget exhausted");
                break;
            }

            let Some(server) = self.strategy.pick(partition, attempts) else {
                break;
            };
            attempts += 1;

            let remaining = self.timeout - elapsed;
            match query_server(
                self.transport.as_ref(),
                server,
                query_id,
                &query_bytes,
                remaining,
            )
            .await
            {
                Ok(result) if ResponseParser::has_answers(&result.message) => {
                    self.metrics.record_answer(server);
                    return Ok(UpstreamReply::new(
                        result.message,
                        Arc::clone(server),
                        result.latency_ms,
                    ));
                }
                Ok(result) => {
                    debug!(
                        server = %server,
                        rcode = ?result.message.response_code(),
                        "Upstream reply without answers, trying next"
                    );
                    tokio::task::yield_now().await;
                }
                Err(e) => {
                    self.metrics.record_drop(server);
                    warn!(server = %server, error = %e, attempt = attempts, "Upstream exchange failed");
                    tokio::task::yield_now().await;
                }
            }
        }

        Err(DomainError::TransportAllServersUnreachable)
    }
}
