use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessStatus {
    Allowed,
    Blocked,
    Refused,
    Unanswered,
    Passthrough,
}

impl AccessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "ALLOWED",
            Self::Blocked => "BLOCKED",
            Self::Refused => "REFUSED",
            Self::Unanswered => "UNANSWERED",
            Self::Passthrough => "PASSTHROUGH",
        }
    }
}

/// One line of the access log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub timestamp: DateTime<Utc>,
    pub client_ip: IpAddr,
    pub region: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded_name: Option<String>,
    pub record_type: u16,
    pub status: AccessStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
    pub elapsed_ms: u64,
}

impl AccessLogEntry {
    pub fn new(client_ip: IpAddr, region: &str, name: &str, record_type: u16) -> Self {
        Self {
            timestamp: Utc::now(),
            client_ip,
            region: region.to_string(),
            name: name.to_string(),
            forwarded_name: None,
            record_type,
            status: AccessStatus::Allowed,
            upstream: None,
            elapsed_ms: 0,
        }
    }

    pub fn with_status(mut self, status: AccessStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_forwarded_name(mut self, name: impl Into<String>) -> Self {
        self.forwarded_name = Some(name.into());
        self
    }

    pub fn with_upstream(mut self, upstream: impl Into<String>) -> Self {
        self.upstream = Some(upstream.into());
        self
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }
}
