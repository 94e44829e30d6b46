use hoopoe_application::ports::AccessLogPort;
use hoopoe_domain::AccessLogEntry;
use tokio::sync::mpsc;

/// Fire-and-forget handle for access-log entries.
#[derive(Clone)]
pub struct AccessLogEmitter {
    sender: Option<mpsc::UnboundedSender<AccessLogEntry>>,
}

impl AccessLogEmitter {
    pub fn new_disabled() -> Self {
        Self { sender: None }
    }

    pub fn new_enabled() -> (Self, mpsc::UnboundedReceiver<AccessLogEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let emitter = Self { sender: Some(tx) };
        (emitter, rx)
    }

    pub fn emit(&self, entry: AccessLogEntry) {
        if let Some(ref tx) = self.sender {
            let _ = tx.send(entry);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }
}

impl AccessLogPort for AccessLogEmitter {
    fn record(&self, entry: AccessLogEntry) {
        self.emit(entry);
    }
}

impl Default for AccessLogEmitter {
    fn default() -> Self {
        Self::new_disabled()
    }
}

impl std::fmt::Debug for AccessLogEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessLogEmitter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
