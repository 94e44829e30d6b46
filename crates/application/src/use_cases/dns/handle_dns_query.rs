use crate::ports::{AccessLogPort, UpstreamForwarder, UpstreamReply};
use crate::services::{dns_syntax, RuleEngine, RuleVerdict, TemplateEngine};
use hoopoe_domain::{
    AccessLogEntry, AccessStatus, DomainError, EngineQuery, Query, QueryResult, RegionMap,
    RequestMetadata,
};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Region classification, rules, templating and forwarding for one query.
pub struct HandleDnsQueryUseCase {
    rules: Arc<RuleEngine>,
    templates: TemplateEngine,
    regions: Arc<RegionMap>,
    forwarder: Arc<dyn UpstreamForwarder>,
    access_log: Option<Arc<dyn AccessLogPort>>,
}

struct Routed {
    query: EngineQuery,
    passthrough: bool,
}

impl HandleDnsQueryUseCase {
    pub fn new(
        rules: Arc<RuleEngine>,
        regions: Arc<RegionMap>,
        forwarder: Arc<dyn UpstreamForwarder>,
    ) -> Self {
        Self {
            rules,
            templates: TemplateEngine::new(),
            regions,
            forwarder,
            access_log: None,
        }
    }

    pub fn with_access_log(mut self, access_log: Arc<dyn AccessLogPort>) -> Self {
        self.access_log = Some(access_log);
        self
    }

    pub fn region_for(&self, client_ip: IpAddr) -> &str {
        self.regions.resolve_addr(client_ip).unwrap_or("")
    }

    /// `query.name` must already be lower-cased.
    ///
    /// Policy refusals come back as errors for which
    /// [`DomainError::is_policy_block`] holds; any other error means no
    /// upstream answered.
    #[instrument(skip(self, query), fields(name = %query.name, qtype = query.record_type))]
    pub async fn execute(
        &self,
        query: Query,
        client_ip: IpAddr,
    ) -> Result<UpstreamReply, DomainError> {
        let start = Instant::now();
        let metadata = RequestMetadata::new(client_ip, self.region_for(client_ip));
        let entry = AccessLogEntry::new(
            client_ip,
            &metadata.region,
            &query.name,
            query.record_type,
        );

        let routed = match self.route(EngineQuery::new(query), &metadata) {
            Ok(routed) => routed,
            Err(e) => {
                let status = match e {
                    DomainError::Blocked => AccessStatus::Blocked,
                    _ => AccessStatus::Refused,
                };
                debug!(error = %e, region = %metadata.region, "Query refused by policy");
                self.log(entry.with_status(status).with_elapsed_ms(elapsed_ms(start)));
                return Err(e);
            }
        };

        let Some(forwarded) = routed.query.first().cloned() else {
            return Err(DomainError::InvalidDomainName("empty query".to_string()));
        };
        let entry = entry.with_forwarded_name(forwarded.name.as_ref());

        match self.forwarder.forward(&forwarded, &metadata).await {
            Ok(reply) => {
                let status = if routed.passthrough {
                    AccessStatus::Passthrough
                } else {
                    AccessStatus::Allowed
                };
                self.log(
                    entry
                        .with_status(status)
                        .with_upstream(reply.server.as_ref())
                        .with_elapsed_ms(elapsed_ms(start)),
                );
                Ok(reply)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    forwarded = %forwarded.name,
                    region = %metadata.region,
                    "No upstream answered"
                );
                self.log(
                    entry
                        .with_status(AccessStatus::Unanswered)
                        .with_elapsed_ms(elapsed_ms(start)),
                );
                Err(e)
            }
        }
    }

    fn route(
        &self,
        query: EngineQuery,
        metadata: &RequestMetadata,
    ) -> Result<Routed, DomainError> {
        let Some(original) = query.first().map(|q| Arc::clone(&q.name)) else {
            return Err(DomainError::InvalidDomainName("empty query".to_string()));
        };

        if query.first().is_some_and(Query::is_ptr) {
            return Ok(Routed {
                query,
                passthrough: true,
            });
        }

        let (query, passthrough) = self.apply_rules(query);
        if query.is_blocked() {
            return Err(DomainError::Blocked);
        }
        if passthrough {
            return Ok(Routed { query, passthrough });
        }

        let query = self.apply_templates(query, metadata)?;
        if let Some(name) = query.first().map(|q| &q.name) {
            if *name != original && !dns_syntax::is_valid_name(name) {
                return Err(DomainError::InvalidDomainName(name.to_string()));
            }
        }

        Ok(Routed { query, passthrough })
    }

    fn apply_rules(&self, mut query: EngineQuery) -> (EngineQuery, bool) {
        let Some(first) = query.queries.first_mut() else {
            query.result = QueryResult::Error;
            return (query, false);
        };

        match self.rules.evaluate(&first.name) {
            RuleVerdict::Pass => (query, true),
            RuleVerdict::Allowed(name) => {
                if name.as_str() != first.name.as_ref() {
                    *first = first.with_name(name);
                }
                (query, false)
            }
            RuleVerdict::Blocked => {
                query.result = QueryResult::Blocked;
                (query, false)
            }
        }
    }

    fn apply_templates(
        &self,
        mut query: EngineQuery,
        metadata: &RequestMetadata,
    ) -> Result<EngineQuery, DomainError> {
        let Some(first) = query.queries.first_mut() else {
            return Ok(query);
        };

        let expanded = match self.templates.expand(&first.name, &metadata.region) {
            Some(name) => name.into_owned(),
            None => return Err(DomainError::UnresolvedTemplate(first.name.to_string())),
        };

        if expanded.as_str() != first.name.as_ref() {
            *first = first.with_name(expanded);
        }

        Ok(query)
    }

    fn log(&self, entry: AccessLogEntry) {
        if let Some(access_log) = &self.access_log {
            access_log.record(entry);
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
