use std::net::IpAddr;
use std::sync::Arc;

pub const PTR_RECORD_TYPE: u16 = 12;

/// A single question under evaluation: lower-cased name plus its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub name: Arc<str>,
    pub record_type: u16,
}

impl Query {
    pub fn new(name: impl Into<Arc<str>>, record_type: u16) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }

    pub fn is_ptr(&self) -> bool {
        self.record_type == PTR_RECORD_TYPE
    }

    pub fn with_name(&self, name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            record_type: self.record_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryResult {
    Allowed,
    Blocked,
    Error,
}

impl QueryResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "ALLOWED",
            Self::Blocked => "BLOCKED",
            Self::Error => "ERROR",
        }
    }
}

/// Query set threaded through the pipeline stages with the decision so far.
#[derive(Debug, Clone)]
pub struct EngineQuery {
    pub queries: Vec<Query>,
    pub result: QueryResult,
}

impl EngineQuery {
    pub fn new(query: Query) -> Self {
        Self {
            queries: vec![query],
            result: QueryResult::Allowed,
        }
    }

    pub fn first(&self) -> Option<&Query> {
        self.queries.first()
    }

    pub fn is_blocked(&self) -> bool {
        self.result != QueryResult::Allowed
    }
}

/// Per-request facts about the client, resolved before the rules run.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub client_ip: IpAddr,
    pub region: Arc<str>,
}

impl RequestMetadata {
    pub fn new(client_ip: IpAddr, region: &str) -> Self {
        Self {
            client_ip,
            region: Arc::from(region),
        }
    }

    pub fn has_region(&self) -> bool {
        !self.region.is_empty()
    }
}
