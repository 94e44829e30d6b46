use hoopoe_domain::AccessLogEntry;

/// Sink for access-log lines. Implementations must not block the caller.
pub trait AccessLogPort: Send + Sync {
    fn record(&self, entry: AccessLogEntry);
}
