use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide request and upstream counters.
#[derive(Clone, Default)]
pub struct UpstreamMetrics {
    received: Arc<AtomicU64>,

    allowed: Arc<AtomicU64>,

    blocked: Arc<AtomicU64>,

    unanswered: Arc<AtomicU64>,

    answers: Arc<DashMap<Arc<str>, u64>>,

    drops: Arc<DashMap<Arc<str>, u64>>,
}

impl UpstreamMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_allowed(&self) {
        self.allowed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_blocked(&self) {
        self.blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unanswered(&self) {
        self.unanswered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_answer(&self, server: &Arc<str>) {
        bump(&self.answers, server);
    }

    /// Failed exchange with `server`.
    pub fn record_drop(&self, server: &Arc<str>) {
        bump(&self.drops, server);
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn allowed(&self) -> u64 {
        self.allowed.load(Ordering::Relaxed)
    }

    pub fn blocked(&self) -> u64 {
        self.blocked.load(Ordering::Relaxed)
    }

    pub fn unanswered(&self) -> u64 {
        self.unanswered.load(Ordering::Relaxed)
    }

    pub fn answers(&self, server: &str) -> u64 {
        self.answers.get(server).map(|v| *v).unwrap_or(0)
    }

    pub fn drops(&self, server: &str) -> u64 {
        self.drops.get(server).map(|v| *v).unwrap_or(0)
    }

    /// Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        let mut out = String::with_capacity(1024);

        counter(
            &mut out,
            "hoopoe_queries_received_total",
            "DNS queries received",
            self.received(),
        );
        counter(
            &mut out,
            "hoopoe_queries_allowed_total",
            "Queries answered by an upstream",
            self.allowed(),
        );
        counter(
            &mut out,
            "hoopoe_queries_blocked_total",
            "Queries refused by policy",
            self.blocked(),
        );
        counter(
            &mut out,
            "hoopoe_queries_unanswered_total",
            "Queries no upstream answered in time",
            self.unanswered(),
        );

        labeled(
            &mut out,
            "hoopoe_upstream_answers_total",
            "Replies relayed per upstream server",
            &self.answers,
        );
        labeled(
            &mut out,
            "hoopoe_upstream_drops_total",
            "Failed exchanges per upstream server",
            &self.drops,
        );

        out
    }
}

fn bump(map: &DashMap<Arc<str>, u64>, server: &Arc<str>) {
    map.entry(Arc::clone(server))
        .and_modify(|c| *c += 1)
        .or_insert(1);
}

fn counter(out: &mut String, name: &str, help: &str, value: u64) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} counter", name);
    let _ = writeln!(out, "{} {}", name, value);
}

fn labeled(out: &mut String, name: &str, help: &str, map: &DashMap<Arc<str>, u64>) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} counter", name);

    let mut rows: Vec<(String, u64)> = map
        .iter()
        .map(|entry| (entry.key().to_string(), *entry.value()))
        .collect();
    rows.sort();

    for (server, value) in rows {
        let _ = writeln!(
            out,
            "{}{{server=\"{}\"}} {}",
            name,
            server.replace('\\', "\\\\").replace('"', "\\\""),
            value
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_server_counters() {
        let metrics = UpstreamMetrics::new();
        let a: Arc<str> = Arc::from("10.0.0.1:53");
        let b: Arc<str> = Arc::from("10.0.0.2:53");

        metrics.record_drop(&a);
        metrics.record_drop(&a);
        metrics.record_answer(&b);

        assert_eq!(metrics.drops("10.0.0.1:53"), 2);
        assert_eq!(metrics.drops("10.0.0.2:53"), 0);
        assert_eq!(metrics.answers("10.0.0.2:53"), 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = UpstreamMetrics::new();
        let clone = metrics.clone();
        clone.record_received();
        clone.record_blocked();
        assert_eq!(metrics.received(), 1);
        assert_eq!(metrics.blocked(), 1);
    }

    #[test]
    fn test_prometheus_output() {
        let metrics = UpstreamMetrics::new();
        metrics.record_received();
        metrics.record_allowed();
        metrics.record_drop(&Arc::from("9.9.9.9:53"));

        let text = metrics.render_prometheus();
        assert!(text.contains("hoopoe_queries_received_total 1"));
        assert!(text.contains("hoopoe_queries_allowed_total 1"));
        assert!(text.contains("hoopoe_queries_unanswered_total 0"));
        assert!(text.contains("hoopoe_upstream_drops_total{server=\"9.9.9.9:53\"} 1"));
        assert!(text.contains("# TYPE hoopoe_upstream_answers_total counter"));
    }
}
