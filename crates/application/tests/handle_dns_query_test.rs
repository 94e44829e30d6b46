mod helpers;

use hoopoe_application::services::RuleEngine;
use hoopoe_application::use_cases::HandleDnsQueryUseCase;
use hoopoe_domain::{
    AccessStatus, DomainError, Query, RegionDefinition, RegionMap, PTR_RECORD_TYPE,
};
use helpers::{MockAccessLog, MockUpstreamForwarder};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

const A: u16 = 1;
const EU_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 0, 7));
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(172, 16, 0, 9));

fn regions() -> Arc<RegionMap> {
    Arc::new(
        RegionMap::build(vec![
            RegionDefinition::new("eu", &["10.1.0.0/16"]),
            RegionDefinition::new("us", &["10.2.0.0/16"]),
        ])
        .unwrap(),
    )
}

fn make_use_case(
    rules: &[&str],
    forwarder: Arc<MockUpstreamForwarder>,
    log: Arc<MockAccessLog>,
) -> HandleDnsQueryUseCase {
    let rules = Arc::new(RuleEngine::compile(rules, true).unwrap());
    HandleDnsQueryUseCase::new(rules, regions(), forwarder).with_access_log(log)
}

// ── policy ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_pass_rule_forwards_original_name() {
    let forwarder = Arc::new(MockUpstreamForwarder::new());
    let log = Arc::new(MockAccessLog::new());
    let use_case = make_use_case(
        &[
            "PASS SUBSTRING health.check.",
            r"DENY REGEXP .*\.ads\..*",
        ],
        forwarder.clone(),
        log.clone(),
    );

    let reply = use_case
        .execute(Query::new("health.check.", A), EU_CLIENT)
        .await
        .unwrap();

    assert_eq!(reply.server.as_ref(), "10.0.0.1:53");
    assert_eq!(forwarder.forwarded_names(), vec!["health.check."]);
    let logs = log.entries();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, AccessStatus::Passthrough);
    assert_eq!(logs[0].region, "eu");
}

#[tokio::test]
async fn test_denied_query_is_not_forwarded() {
    let forwarder = Arc::new(MockUpstreamForwarder::new());
    let log = Arc::new(MockAccessLog::new());
    let use_case = make_use_case(
        &["ALLOW REGEXP .*", r"DENY REGEXP .*\.ads\..*"],
        forwarder.clone(),
        log.clone(),
    );

    let result = use_case
        .execute(Query::new("track.ads.example.", A), EU_CLIENT)
        .await;

    assert_eq!(result.unwrap_err(), DomainError::Blocked);
    assert!(forwarder.forwarded().is_empty());
    assert_eq!(log.entries()[0].status, AccessStatus::Blocked);
}

#[tokio::test]
async fn test_empty_allow_list_blocks() {
    let forwarder = Arc::new(MockUpstreamForwarder::new());
    let log = Arc::new(MockAccessLog::new());
    let use_case = make_use_case(&["DENY PREFIX ads."], forwarder.clone(), log);

    let result = use_case
        .execute(Query::new("www.example.com.", A), EU_CLIENT)
        .await;

    assert!(result.unwrap_err().is_policy_block());
    assert!(forwarder.forwarded().is_empty());
}

#[tokio::test]
async fn test_ptr_bypasses_rules() {
    let forwarder = Arc::new(MockUpstreamForwarder::new());
    let log = Arc::new(MockAccessLog::new());
    let use_case = make_use_case(&["DENY REGEXP .*"], forwarder.clone(), log.clone());

    let result = use_case
        .execute(
            Query::new("7.0.1.10.in-addr.arpa.", PTR_RECORD_TYPE),
            EU_CLIENT,
        )
        .await;

    assert!(result.is_ok());
    assert_eq!(forwarder.forwarded_names(), vec!["7.0.1.10.in-addr.arpa."]);
    assert_eq!(log.entries()[0].status, AccessStatus::Passthrough);
}

// ── rewrite + templates ────────────────────────────────────────────────────

#[tokio::test]
async fn test_rewrite_then_region_template() {
    let forwarder = Arc::new(MockUpstreamForwarder::new());
    let log = Arc::new(MockAccessLog::new());
    let use_case = make_use_case(
        &[
            "ALLOW SUFFIX .",
            "RW SUFFIX .svc.example. .svc.{REGION}.example.",
        ],
        forwarder.clone(),
        log.clone(),
    );

    use_case
        .execute(Query::new("api.svc.example.", A), EU_CLIENT)
        .await
        .unwrap();
    use_case
        .execute(Query::new("api.svc.example.", A), UNKNOWN_CLIENT)
        .await
        .unwrap();

    assert_eq!(
        forwarder.forwarded_names(),
        vec!["api.svc.eu.example.", "api.svc.example."]
    );
    let forwarded = forwarder.forwarded();
    assert_eq!(forwarded[0].1.region.as_ref(), "eu");
    assert!(!forwarded[1].1.has_region());

    let logs = log.entries();
    assert_eq!(logs[0].status, AccessStatus::Allowed);
    assert_eq!(logs[0].forwarded_name.as_deref(), Some("api.svc.eu.example."));
    assert_eq!(logs[0].upstream.as_deref(), Some("10.0.0.1:53"));
}

#[tokio::test]
async fn test_unresolved_template_is_refused() {
    let forwarder = Arc::new(MockUpstreamForwarder::new());
    let log = Arc::new(MockAccessLog::new());
    let use_case = make_use_case(
        &["ALLOW SUFFIX .", "RW SUFFIX .svc. .{ZONE}.svc."],
        forwarder.clone(),
        log.clone(),
    );

    let result = use_case
        .execute(Query::new("api.svc.", A), EU_CLIENT)
        .await;

    assert!(matches!(result, Err(DomainError::UnresolvedTemplate(_))));
    assert!(forwarder.forwarded().is_empty());
    assert_eq!(log.entries()[0].status, AccessStatus::Refused);
}

#[tokio::test]
async fn test_invalid_rewritten_name_is_refused() {
    let forwarder = Arc::new(MockUpstreamForwarder::new());
    let log = Arc::new(MockAccessLog::new());
    let use_case = make_use_case(
        &["ALLOW SUFFIX .", r"RW REGEXP ^(.*)$ $1$1"],
        forwarder.clone(),
        log,
    );

    let result = use_case
        .execute(Query::new("a.example.", A), EU_CLIENT)
        .await;

    assert!(matches!(result, Err(DomainError::InvalidDomainName(_))));
    assert!(forwarder.forwarded().is_empty());
}

// ── upstream failures ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_upstream_failure_is_unanswered() {
    let forwarder = Arc::new(MockUpstreamForwarder::new());
    forwarder.set_failure(DomainError::TransportAllServersUnreachable);
    let log = Arc::new(MockAccessLog::new());
    let use_case = make_use_case(&["ALLOW SUFFIX ."], forwarder.clone(), log.clone());

    let result = use_case
        .execute(Query::new("www.example.com.", A), EU_CLIENT)
        .await;

    let err = result.unwrap_err();
    assert!(!err.is_policy_block());
    assert_eq!(forwarder.forwarded().len(), 1);
    assert_eq!(log.entries()[0].status, AccessStatus::Unanswered);
}

#[tokio::test]
async fn test_without_access_log() {
    let forwarder = Arc::new(MockUpstreamForwarder::new());
    let rules = Arc::new(RuleEngine::compile(&["ALLOW SUFFIX ."], true).unwrap());
    let use_case = HandleDnsQueryUseCase::new(rules, Arc::new(RegionMap::empty()), forwarder);

    assert_eq!(use_case.region_for(EU_CLIENT), "");
    assert!(use_case
        .execute(Query::new("www.example.com.", A), EU_CLIENT)
        .await
        .is_ok());
}
