use hoopoe_application::ports::AccessLogPort;
use hoopoe_application::services::RuleEngine;
use hoopoe_application::use_cases::HandleDnsQueryUseCase;
use hoopoe_domain::{Config, RegionMap};
use hoopoe_infrastructure::{
    AccessLogEmitter, AccessLogWriter, DnsServerHandler, LoadBalancedForwarder, UdpTransport,
    UpstreamMetrics,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything that decides what happens to a query. Built before serving;
/// a failure here means the configuration is unusable.
pub struct Policy {
    pub rules: Arc<RuleEngine>,
    pub regions: Arc<RegionMap>,
    pub forwarder: LoadBalancedForwarder,
}

impl Policy {
    pub fn build(config: &Config) -> anyhow::Result<Self> {
        let rules = RuleEngine::compile(&config.rules.proxy_rules, config.rules.scan_all)?;
        if rules.allow_count() == 0 {
            warn!("No Allow rules configured: every query that does not match a Pass rule will be refused");
        }
        let regions = Self::load_regions(&config.client_map_file)?;
        let forwarder =
            LoadBalancedForwarder::from_config(&config.upstream, Arc::new(UdpTransport::new()))?;

        for server in &config.upstream.servers {
            if let Some(region) = server.region() {
                if !regions.region_names().any(|r| r == region) {
                    warn!(
                        server = %server,
                        region,
                        "Upstream bound to a region missing from the client map"
                    );
                }
            }
        }

        info!(
            rules = rules.rule_count(),
            regions = regions.len(),
            upstreams = config.upstream.servers.len(),
            lb_type = config.upstream.lb_type.as_str(),
            timeout = ?forwarder.timeout(),
            "Policy ready"
        );

        Ok(Self {
            rules: Arc::new(rules),
            regions: Arc::new(regions),
            forwarder,
        })
    }

    fn load_regions(path: &str) -> anyhow::Result<RegionMap> {
        match RegionMap::load(path)? {
            Some(map) => {
                info!(path, regions = map.len(), "Client map loaded");
                Ok(map)
            }
            None => {
                info!(path, "No client map found, all clients are unclassified");
                Ok(RegionMap::empty())
            }
        }
    }
}

pub struct DnsServices {
    pub handler: DnsServerHandler,
    pub metrics: UpstreamMetrics,
}

impl DnsServices {
    pub async fn new(config: &Config, policy: Policy) -> anyhow::Result<Self> {
        let metrics = UpstreamMetrics::new();
        let forwarder = policy.forwarder.with_metrics(metrics.clone());

        let mut use_case =
            HandleDnsQueryUseCase::new(policy.rules, policy.regions, Arc::new(forwarder));
        if let Some(access_log) = Self::setup_access_log(config).await {
            use_case = use_case.with_access_log(access_log);
        }

        let handler = DnsServerHandler::new(Arc::new(use_case)).with_metrics(metrics.clone());

        Ok(Self { handler, metrics })
    }

    async fn setup_access_log(config: &Config) -> Option<Arc<dyn AccessLogPort>> {
        let path = config.access_log.path.trim();
        if !config.access_log.enabled || path.is_empty() {
            return None;
        }

        match AccessLogWriter::open(path).await {
            Ok(writer) => {
                let (emitter, rx) = AccessLogEmitter::new_enabled();
                writer.start(rx);
                info!(path, "Access log enabled");
                Some(Arc::new(emitter))
            }
            Err(e) => {
                warn!(path, error = %e, "Access log unavailable, continuing without it");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoopoe_domain::UpstreamServer;

    fn config(rules: &[&str]) -> Config {
        let mut config = Config::default();
        config.upstream.servers = vec![UpstreamServer::new("192.0.2.53:53")];
        config.rules.proxy_rules = rules.iter().map(|r| r.to_string()).collect();
        config.client_map_file = "/nonexistent/hoopoe-clients.yml".to_string();
        config
    }

    #[test]
    fn test_policy_without_allow_rules_still_builds() {
        let policy = Policy::build(&config(&["PASS SUFFIX lan."])).unwrap();
        assert_eq!(policy.rules.allow_count(), 0);
        assert_eq!(policy.rules.rule_count(), 1);
    }

    #[test]
    fn test_policy_counts_compiled_allow_rules() {
        let policy = Policy::build(&config(&["a SUFFIX lan.", "ALLOW PREFIX www.", "DENY SUFFIX ads."]))
            .unwrap();
        assert_eq!(policy.rules.allow_count(), 2);
    }
}
